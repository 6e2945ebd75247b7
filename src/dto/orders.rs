use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Customer, Order, OrderItem};

/// An order joined with its customer and line items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

/// A batch element that could not be stored, with enough identity for an
/// operator to find and fix the source row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchError {
    pub index: usize,
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub contact_no: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct BatchOutcome {
    pub results: Vec<OrderDetails>,
    pub errors: Vec<BatchError>,
}

/// Workflow fields an operator may change after intake. Line items and
/// customer identity are only changed through a full upsert.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub order_status: Option<String>,
    pub order_confirmation: Option<String>,
    pub comments: Option<String>,
    pub process_order: Option<bool>,
    pub order_packed: Option<bool>,
    pub order_cancelled: Option<bool>,
    pub delivered: Option<bool>,
    pub is_rto: Option<bool>,
    pub is_return: Option<bool>,
    pub rto_reason: Option<String>,
    pub return_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub review: Option<String>,
}
