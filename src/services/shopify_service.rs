use serde_json::Value;

use crate::{
    dto::{
        orders::OrderDetails,
        shopify::ShopifyPage,
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::{normalizer, order_service},
    shopify::{OrderFilter, Page, types::{ShopifyCustomer, ShopifyOrder}},
    state::AppState,
};

fn page_response<T>(message: &str, page: Page<T>) -> ApiResponse<ShopifyPage<T>>
where
    T: serde::Serialize,
{
    let meta = Meta::cursors(page.next_page_info.clone(), page.previous_page_info.clone());
    ApiResponse::success(
        message,
        ShopifyPage {
            items: page.items,
            next_page_info: page.next_page_info,
            previous_page_info: page.previous_page_info,
        },
        Some(meta),
    )
}

fn collection_response<T>(message: &str, items: Vec<T>) -> ApiResponse<ShopifyPage<T>>
where
    T: serde::Serialize,
{
    let meta = Meta::total(items.len());
    ApiResponse::success(
        message,
        ShopifyPage {
            items,
            next_page_info: None,
            previous_page_info: None,
        },
        Some(meta),
    )
}

pub async fn list_customers(
    state: &AppState,
    page_info: Option<&str>,
    all: bool,
) -> AppResult<ApiResponse<ShopifyPage<ShopifyCustomer>>> {
    if all {
        let customers = state.shopify.all_customers().await;
        return Ok(collection_response("Shopify customers", customers));
    }
    let page = state.shopify.customers_page(page_info).await?;
    Ok(page_response("Shopify customers", page))
}

pub async fn search_customers(
    state: &AppState,
    query: &str,
) -> AppResult<ApiResponse<ShopifyPage<ShopifyCustomer>>> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest("query must not be empty".into()));
    }
    let customers = state.shopify.search_customers(query.trim()).await?;
    Ok(collection_response("Shopify customers", customers))
}

pub async fn get_customer(state: &AppState, id: i64) -> AppResult<ApiResponse<ShopifyCustomer>> {
    let customer = state.shopify.customer(id).await?;
    Ok(ApiResponse::success("OK", customer, Some(Meta::empty())))
}

pub async fn customer_orders(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<ShopifyPage<ShopifyOrder>>> {
    let orders = state.shopify.customer_orders(id).await;
    Ok(collection_response("Shopify orders", orders))
}

pub async fn list_orders(
    state: &AppState,
    filter: OrderFilter,
    page_info: Option<&str>,
    all: bool,
) -> AppResult<ApiResponse<ShopifyPage<ShopifyOrder>>> {
    if all {
        let orders = state.shopify.all_orders(&filter).await;
        return Ok(collection_response("Shopify orders", orders));
    }
    let page = state.shopify.orders_page(&filter, page_info).await?;
    Ok(page_response("Shopify orders", page))
}

pub async fn get_order(state: &AppState, id: i64) -> AppResult<ApiResponse<ShopifyOrder>> {
    let order = state.shopify.order(id).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// `orders/create` and `orders/updated` webhooks deliver the order object
/// as the body; anything else is rejected before it reaches the normaliser.
pub async fn receive_webhook(state: &AppState, payload: Value) -> AppResult<ApiResponse<OrderDetails>> {
    if !normalizer::is_shopify_payload(&payload) {
        return Err(AppError::Validation(
            "webhook body is not a Shopify order".into(),
        ));
    }
    order_service::submit_order(state, payload).await
}
