use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::Value;

use crate::{
    dto::orders::{BatchOutcome, OrderDetails, OrderPatch},
    error::AppResult,
    models::Order,
    response::ApiResponse,
    services::{batch_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/batch", post(create_batch))
        .route("/bulk", post(bulk_insert))
        .route("/{order_id}", get(get_order).patch(update_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body(content = Object, description = "Operator order or Shopify order payload"),
    responses(
        (status = 200, description = "Order created or replaced", body = ApiResponse<OrderDetails>),
        (status = 422, description = "Missing fields or unknown product")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    let resp = order_service::submit_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/batch",
    request_body(content = Vec<Object>, description = "Order payloads, each upserted independently"),
    responses(
        (status = 200, description = "Per-item results and errors", body = ApiResponse<BatchOutcome>)
    ),
    tag = "Orders"
)]
pub async fn create_batch(
    State(state): State<AppState>,
    Json(payloads): Json<Vec<Value>>,
) -> AppResult<Json<ApiResponse<BatchOutcome>>> {
    let resp = batch_service::submit_batch(&state, payloads).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/bulk",
    request_body(content = Vec<Object>, description = "Spreadsheet rows with DD/MM/YYYY dates"),
    responses(
        (status = 200, description = "Per-row results and errors", body = ApiResponse<BatchOutcome>)
    ),
    tag = "Orders"
)]
pub async fn bulk_insert(
    State(state): State<AppState>,
    Json(rows): Json<Vec<Value>>,
) -> AppResult<Json<ApiResponse<BatchOutcome>>> {
    let resp = batch_service::submit_bulk(&state, rows).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = String, Path, description = "External order identifier")),
    responses(
        (status = 200, description = "Order with customer and items", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Unknown order")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    let resp = order_service::get_order(&state, &order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}",
    params(("order_id" = String, Path, description = "External order identifier")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Workflow fields updated", body = ApiResponse<Order>),
        (status = 404, description = "Unknown order")
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::patch_order(&state, &order_id, patch).await?;
    Ok(Json(resp))
}
