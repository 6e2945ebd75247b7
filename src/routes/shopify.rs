use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde_json::Value;

use crate::{
    dto::{
        orders::OrderDetails,
        shopify::{ShopifyPage, SyncOutcome, SyncRequest},
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::{CustomerSearchQuery, ShopifyListQuery, ShopifyOrderQuery},
    services::{shopify_service, sync_service},
    shopify::{
        OrderFilter,
        types::{ShopifyCustomer, ShopifyOrder},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/orders", post(order_webhook))
        .route("/sync", post(sync_orders))
        .route("/customers", get(list_customers))
        .route("/customers/search", get(search_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}/orders", get(customer_orders))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/shopify/webhooks/orders",
    request_body = ShopifyOrder,
    responses(
        (status = 200, description = "Order upserted", body = ApiResponse<OrderDetails>),
        (status = 422, description = "Not a Shopify order or unknown SKU")
    ),
    tag = "Shopify"
)]
pub async fn order_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    let resp = shopify_service::receive_webhook(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shopify/sync",
    request_body(content = SyncRequest, description = "Optional; omit to sync the configured customers"),
    responses(
        (status = 200, description = "Sync summary", body = ApiResponse<SyncOutcome>)
    ),
    tag = "Shopify"
)]
pub async fn sync_orders(
    State(state): State<AppState>,
    req: Option<Json<SyncRequest>>,
) -> AppResult<Json<ApiResponse<SyncOutcome>>> {
    // No body syncs the configured customers.
    let customer_ids = req.and_then(|Json(req)| req.customer_ids);
    let resp = sync_service::run_sync(&state, customer_ids).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/customers",
    params(
        ("page_info" = Option<String>, Query, description = "Cursor from a previous page"),
        ("all" = Option<bool>, Query, description = "Follow every page")
    ),
    responses(
        (status = 200, body = ApiResponse<ShopifyPage<ShopifyCustomer>>),
        (status = 502, description = "Shopify error"),
        (status = 504, description = "Shopify timed out")
    ),
    tag = "Shopify"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ShopifyListQuery>,
) -> AppResult<Json<ApiResponse<ShopifyPage<ShopifyCustomer>>>> {
    let resp = shopify_service::list_customers(
        &state,
        query.page_info.as_deref(),
        query.all.unwrap_or(false),
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/customers/search",
    params(("query" = String, Query, description = "Shopify customer search query")),
    responses(
        (status = 200, body = ApiResponse<ShopifyPage<ShopifyCustomer>>),
        (status = 400, description = "Empty query")
    ),
    tag = "Shopify"
)]
pub async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerSearchQuery>,
) -> AppResult<Json<ApiResponse<ShopifyPage<ShopifyCustomer>>>> {
    let resp = shopify_service::search_customers(&state, &query.query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/customers/{id}",
    params(("id" = i64, Path, description = "Shopify customer id")),
    responses((status = 200, body = ApiResponse<ShopifyCustomer>)),
    tag = "Shopify"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ShopifyCustomer>>> {
    let resp = shopify_service::get_customer(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/customers/{id}/orders",
    params(("id" = i64, Path, description = "Shopify customer id")),
    responses((status = 200, body = ApiResponse<ShopifyPage<ShopifyOrder>>)),
    tag = "Shopify"
)]
pub async fn customer_orders(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ShopifyPage<ShopifyOrder>>>> {
    let resp = shopify_service::customer_orders(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/orders",
    params(
        ("status" = Option<String>, Query, description = "open, closed, cancelled or any"),
        ("customer_id" = Option<i64>, Query, description = "Shopify customer id"),
        ("page_info" = Option<String>, Query, description = "Cursor from a previous page"),
        ("all" = Option<bool>, Query, description = "Follow every page")
    ),
    responses((status = 200, body = ApiResponse<ShopifyPage<ShopifyOrder>>)),
    tag = "Shopify"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ShopifyOrderQuery>,
) -> AppResult<Json<ApiResponse<ShopifyPage<ShopifyOrder>>>> {
    let filter = OrderFilter {
        status: query.status,
        customer_id: query.customer_id,
    };
    let resp = shopify_service::list_orders(
        &state,
        filter,
        query.page_info.as_deref(),
        query.all.unwrap_or(false),
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shopify/orders/{id}",
    params(("id" = i64, Path, description = "Shopify order id")),
    responses((status = 200, body = ApiResponse<ShopifyOrder>)),
    tag = "Shopify"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ShopifyOrder>>> {
    let resp = shopify_service::get_order(&state, id).await?;
    Ok(Json(resp))
}
