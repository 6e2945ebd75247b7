use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::orders::{BatchError, OrderDetails};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SyncRequest {
    /// Overrides the configured customer list for this run.
    pub customer_ids: Option<Vec<i64>>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SyncOutcome {
    pub results: Vec<OrderDetails>,
    pub errors: Vec<BatchError>,
    /// Orders left out because none of their line items matched a catalog code.
    pub skipped: usize,
}

/// A page of Shopify records with the cursors to move around it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShopifyPage<T> {
    pub items: Vec<T>,
    pub next_page_info: Option<String>,
    pub previous_page_info: Option<String>,
}
