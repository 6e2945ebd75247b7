use order_sync::{config::DatabaseConfig, db, services::catalog::seed_catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env()?;

    let orm = db::connect(&config).await?;
    // Ensure migrations are applied.
    db::run_migrations(&orm).await?;

    let (inserted, total) = seed_catalog(&orm).await?;
    orm.close().await?;

    println!("Seed completed. {inserted} of {total} catalog codes were new");
    Ok(())
}
