use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        customers::CustomerPatch,
        orders::{BatchError, BatchOutcome, OrderDetails, OrderPatch},
        shopify::{ShopifyPage, SyncOutcome, SyncRequest},
    },
    entity::orders::PaymentMode,
    models::{Customer, Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::{customers, health, orders, params, shopify},
    shopify::types::{ShopifyAddress, ShopifyCustomer, ShopifyFulfillment, ShopifyLineItem, ShopifyOrder},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        orders::create_order,
        orders::create_batch,
        orders::bulk_insert,
        orders::get_order,
        orders::update_order,
        customers::get_customer,
        customers::update_customer,
        shopify::order_webhook,
        shopify::sync_orders,
        shopify::list_customers,
        shopify::search_customers,
        shopify::get_customer,
        shopify::customer_orders,
        shopify::list_orders,
        shopify::get_order
    ),
    components(
        schemas(
            Customer,
            Order,
            OrderItem,
            PaymentMode,
            OrderDetails,
            OrderPatch,
            CustomerPatch,
            BatchError,
            BatchOutcome,
            SyncRequest,
            SyncOutcome,
            ShopifyOrder,
            ShopifyCustomer,
            ShopifyAddress,
            ShopifyLineItem,
            ShopifyFulfillment,
            params::ShopifyListQuery,
            params::ShopifyOrderQuery,
            params::CustomerSearchQuery,
            Meta,
            ApiResponse<OrderDetails>,
            ApiResponse<BatchOutcome>,
            ApiResponse<SyncOutcome>,
            ApiResponse<ShopifyPage<ShopifyOrder>>,
            ApiResponse<ShopifyPage<ShopifyCustomer>>
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Orders", description = "Order upsert, batch and bulk import"),
        (name = "Customers", description = "Local customer records"),
        (name = "Shopify", description = "Webhook, sync and Shopify passthrough"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
