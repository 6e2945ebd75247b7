use sea_orm::DatabaseConnection;

use crate::shopify::ShopifyClient;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub shopify: ShopifyClient,
    /// Shopify customers walked by `POST /shopify/sync` when the request names none.
    pub sync_customer_ids: Vec<i64>,
}
