use order_sync::{config::DatabaseConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env()?;
    let orm = db::connect(&config).await?;
    db::run_migrations(&orm).await?;
    orm.close().await?;
    println!("Migrations applied");
    Ok(())
}
