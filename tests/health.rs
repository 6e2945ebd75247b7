mod common;

use axum::extract::State;
use order_sync::routes::health::{health_check, readiness};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn readiness_pings_database() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let state = common::app_state(orm, "http://127.0.0.1:9");

    let response = readiness(State(state)).await?;
    assert_eq!(response.0.data.expect("ready data").status, "ready");
    Ok(())
}
