use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::customers::CustomerPatch,
    error::AppResult,
    models::Customer,
    response::ApiResponse,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_customer).patch(update_customer))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, body = ApiResponse<Customer>),
        (status = 404, description = "Unknown customer")
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::get_customer(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerPatch,
    responses(
        (status = 200, body = ApiResponse<Customer>),
        (status = 404, description = "Unknown customer")
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<CustomerPatch>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::update_customer(&state, id, patch).await?;
    Ok(Json(resp))
}
