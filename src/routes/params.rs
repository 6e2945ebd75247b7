use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ShopifyListQuery {
    /// Cursor returned by a previous page.
    pub page_info: Option<String>,
    /// Follow every page and return the whole collection.
    pub all: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ShopifyOrderQuery {
    pub status: Option<String>,
    pub customer_id: Option<i64>,
    pub page_info: Option<String>,
    pub all: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerSearchQuery {
    pub query: String,
}
