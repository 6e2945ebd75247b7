#![allow(dead_code)]

use std::time::Duration;

use chrono::Utc;
use order_sync::{
    config::{DatabaseConfig, ShopifyConfig},
    db,
    entity::{Selections, products::ActiveModel as ProductActive},
    shopify::ShopifyClient,
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};

pub const TOKEN: &str = "shpat_test_token";

/// A fresh in-memory database per test. A single connection keeps every
/// query on the same SQLite memory instance.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    let mut config = DatabaseConfig::new("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;
    config.acquire_timeout = Duration::from_secs(5);
    let orm = db::connect(&config).await?;
    db::run_migrations(&orm).await?;
    Ok(orm)
}

pub async fn seed_product(
    orm: &DatabaseConnection,
    code: &str,
    base_price: Decimal,
    is_active: bool,
) -> anyhow::Result<i32> {
    let product = ProductActive {
        id: NotSet,
        product_code: Set(code.to_string()),
        name: Set(format!("{code} test product")),
        base_price: Set(base_price),
        available_colors: Set(Selections::from(vec!["Black".to_string(), "White".to_string()])),
        available_sizes: Set(Selections::from(vec!["M".to_string(), "XL".to_string()])),
        is_active: Set(is_active),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    Ok(product.id)
}

pub fn shopify_config(uri: &str) -> ShopifyConfig {
    let mut config = ShopifyConfig::new(uri, TOKEN);
    config.page_delay = Duration::ZERO;
    config.timeout = Duration::from_secs(5);
    config
}

pub fn shopify_client(uri: &str) -> ShopifyClient {
    ShopifyClient::new(&shopify_config(uri)).expect("shopify client")
}

pub fn app_state(orm: DatabaseConnection, uri: &str) -> AppState {
    AppState {
        orm,
        shopify: shopify_client(uri),
        sync_customer_ids: Vec::new(),
    }
}

pub fn manual_order(order_id: &str, product_id: i32, quantity: i32, unit_price: &str) -> Value {
    json!({
        "orderId": order_id,
        "customerName": "Asha Rao",
        "contactNo": "919876543210",
        "state": "Karnataka",
        "date": "2024-03-09",
        "orderItems": [{
            "productId": product_id,
            "selectedColors": ["Black"],
            "selectedSizes": ["XL"],
            "quantity": quantity,
            "unitPrice": unit_price
        }],
        "totalAmount": "599.98",
        "paymentMode": "COD"
    })
}

pub fn shopify_order(order_number: i64, sku: &str, price: &str) -> Value {
    json!({
        "id": 5_000_000 + order_number,
        "order_number": order_number,
        "email": "asha@example.com",
        "phone": "+919876543210",
        "created_at": "2024-03-09T10:15:00+05:30",
        "total_price": "1099.50",
        "payment_gateway_names": ["Cash on Delivery (COD)"],
        "fulfillments": [{ "status": "success", "shipment_status": "in_transit" }],
        "customer": {
            "id": 7_001,
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "state": "enabled",
            "default_address": {
                "address1": "12 MG Road",
                "city": "Bengaluru",
                "province": "Karnataka",
                "country": "India"
            }
        },
        "line_items": [{
            "id": 1,
            "sku": sku,
            "title": "Oxford Shirt",
            "variant_title": "Black / XL",
            "quantity": 3,
            "price": price
        }],
        "note": "leave at door"
    })
}
