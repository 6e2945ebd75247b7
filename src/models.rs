use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::orders::PaymentMode;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub customer_name: String,
    pub contact_no: String,
    pub shopify_customer_id: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub order_id: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub state: Option<String>,
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    pub order_confirmation: String,
    pub order_status: String,
    pub comments: String,
    pub process_order: bool,
    pub order_packed: bool,
    pub order_cancelled: bool,
    pub delivered: bool,
    pub is_rto: bool,
    pub is_return: bool,
    pub rto_reason: Option<String>,
    pub return_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub selected_colors: Vec<String>,
    pub selected_sizes: Vec<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
