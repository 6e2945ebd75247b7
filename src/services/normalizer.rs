//! Turns incoming order payloads into one canonical [`OrderVariables`].
//!
//! Two shapes are accepted: the operator shape (camelCase fields, entered by
//! hand or exported from a spreadsheet) and a Shopify order, recognised by
//! carrying `customer`, `line_items` and `order_number` together.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    entity::orders::PaymentMode,
    error::{AppError, AppResult},
    services::catalog::resolve_product_code,
    shopify::{
        status::{self, DEFAULT_STATUS},
        types::ShopifyOrder,
    },
};

/// Account states Shopify reports in `customer.state`; these never name a region.
const SHOPIFY_ACCOUNT_STATES: &[&str] = &["enabled", "disabled", "invited", "declined"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    Manual,
    Shopify,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Manual => "manual",
            OrderSource::Shopify => "shopify",
        }
    }
}

/// How a line item names its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    /// Catalog row id supplied by the caller.
    Id(i32),
    /// Catalog code, looked up among active products.
    Code(String),
    /// A SKU that matched no known code.
    Unmatched(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerInput {
    pub name: String,
    pub contact_no: String,
    pub shopify_customer_id: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemInput {
    pub product: ProductRef,
    pub selected_colors: Vec<String>,
    pub selected_sizes: Vec<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowFlags {
    pub process_order: bool,
    pub order_packed: bool,
    pub order_cancelled: bool,
    pub delivered: bool,
    pub is_rto: bool,
    pub is_return: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderVariables {
    pub order_id: String,
    pub customer: CustomerInput,
    pub order_date: NaiveDate,
    pub state: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    pub order_confirmation: String,
    pub comments: String,
    pub order_status: String,
    pub flags: WorkflowFlags,
    pub rto_reason: Option<String>,
    pub return_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrder {
    pub source: OrderSource,
    pub order: OrderVariables,
}

impl NormalizedOrder {
    /// Drop line items whose SKU matched no catalog code; returns how many remain.
    pub fn retain_matched_items(&mut self) -> usize {
        self.order
            .items
            .retain(|item| !matches!(item.product, ProductRef::Unmatched(_)));
        self.order.items.len()
    }
}

/// Identifying fields pulled from a raw payload, for error reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadIdentity {
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub contact_no: Option<String>,
}

pub fn is_shopify_payload(payload: &Value) -> bool {
    payload.get("customer").is_some()
        && payload.get("line_items").is_some()
        && payload.get("order_number").is_some()
}

pub fn normalize(payload: Value) -> AppResult<NormalizedOrder> {
    if !payload.is_object() {
        return Err(AppError::missing_fields(&[
            "orderId",
            "customerName",
            "contactNo",
            "orderItems",
        ]));
    }

    if is_shopify_payload(&payload) {
        let order: ShopifyOrder = serde_json::from_value(payload)
            .map_err(|e| AppError::Validation(format!("malformed Shopify order: {e}")))?;
        from_shopify(order)
    } else {
        let manual: ManualOrderPayload = serde_json::from_value(payload)
            .map_err(|e| AppError::Validation(format!("malformed order payload: {e}")))?;
        from_manual(manual)
    }
}

/// Best-effort identity of a payload that may not normalise at all.
pub fn identify(payload: &Value) -> PayloadIdentity {
    let text = |v: &Value| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    if is_shopify_payload(payload) {
        let customer = &payload["customer"];
        let name = [&customer["first_name"], &customer["last_name"]]
            .into_iter()
            .filter_map(|v| text(v))
            .collect::<Vec<_>>()
            .join(" ");
        PayloadIdentity {
            order_id: text(&payload["order_number"]),
            customer_name: (!name.is_empty()).then_some(name),
            contact_no: text(&payload["phone"])
                .or_else(|| text(&customer["phone"]))
                .or_else(|| text(&payload["billing_address"]["phone"])),
        }
    } else {
        PayloadIdentity {
            order_id: text(&payload["orderId"]),
            customer_name: text(&payload["customerName"]),
            contact_no: text(&payload["contactNo"]),
        }
    }
}

pub fn from_shopify(order: ShopifyOrder) -> AppResult<NormalizedOrder> {
    let customer = order.customer.as_ref();
    let name = customer.map(|c| c.full_name()).unwrap_or_default();
    let contact_no = order.contact_phone();

    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("customerName");
    }
    if contact_no.is_none() {
        missing.push("contactNo");
    }
    if order.line_items.is_empty() {
        missing.push("orderItems");
    }
    if !missing.is_empty() {
        return Err(AppError::missing_fields(&missing));
    }

    let default_address = customer.and_then(|c| c.default_address.as_ref());
    let state = customer
        .and_then(|c| clean(c.state.clone()))
        .filter(|s| !SHOPIFY_ACCOUNT_STATES.contains(&s.to_ascii_lowercase().as_str()))
        .or_else(|| default_address.and_then(|a| clean(a.province.clone())))
        .or_else(|| {
            order
                .shipping_address
                .as_ref()
                .and_then(|a| clean(a.province.clone()))
        })
        .or_else(|| {
            order
                .billing_address
                .as_ref()
                .and_then(|a| clean(a.province.clone()))
        });
    let postal = order.shipping_address.as_ref().or(default_address);

    let mut items = Vec::with_capacity(order.line_items.len());
    for (index, line) in order.line_items.iter().enumerate() {
        let sku = line.sku.as_deref().unwrap_or_default().trim();
        let label = line
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(sku);
        // Unmatched lines never reach storage, so their variant shape is irrelevant.
        let Some(code) = resolve_product_code(sku) else {
            items.push(OrderItemInput {
                product: ProductRef::Unmatched(label.to_string()),
                selected_colors: Vec::new(),
                selected_sizes: Vec::new(),
                quantity: line.quantity,
                unit_price: line.price,
            });
            continue;
        };
        let (color, size) = split_variant_title(line.variant_title.as_deref()).ok_or_else(|| {
            AppError::Validation(format!(
                "line item {index} ({label}): variant title {:?} is not in \"Color / Size\" form",
                line.variant_title.as_deref().unwrap_or_default()
            ))
        })?;
        items.push(OrderItemInput {
            product: ProductRef::Code(code.to_string()),
            selected_colors: vec![color],
            selected_sizes: vec![size],
            quantity: line.quantity,
            unit_price: line.price,
        });
    }

    let order_status = order
        .latest_shipment_status()
        .and_then(status::from_shopify)
        .unwrap_or(DEFAULT_STATUS)
        .to_string();
    let payment_mode = if order.is_cash_on_delivery() {
        PaymentMode::Cod
    } else {
        PaymentMode::Paid
    };

    Ok(NormalizedOrder {
        source: OrderSource::Shopify,
        order: OrderVariables {
            order_id: order.order_number.to_string(),
            customer: CustomerInput {
                name,
                contact_no: contact_no.unwrap_or_default(),
                shopify_customer_id: customer.map(|c| c.id.to_string()),
                email: clean(order.email.clone()).or_else(|| customer.and_then(|c| clean(c.email.clone()))),
                address: postal.and_then(|a| a.street()),
                city: postal.and_then(|a| clean(a.city.clone())),
                country: postal.and_then(|a| clean(a.country.clone())),
                state: state.clone(),
            },
            order_date: order
                .created_at
                .as_deref()
                .and_then(parse_date)
                .unwrap_or_else(today),
            state,
            items,
            total_amount: order.total_price.unwrap_or(Decimal::ZERO),
            payment_mode,
            order_confirmation: String::new(),
            comments: clean(order.note.clone()).unwrap_or_default(),
            order_status,
            flags: WorkflowFlags::default(),
            rto_reason: None,
            return_reason: None,
            cancel_reason: None,
            review: None,
        },
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualOrderPayload {
    #[serde(default, deserialize_with = "opt_text")]
    order_id: Option<String>,
    customer_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    contact_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    shopify_customer_id: Option<String>,
    email: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    state: Option<String>,
    date: Option<String>,
    order_items: Option<Vec<ManualItem>>,
    total_amount: Option<Decimal>,
    payment_mode: Option<String>,
    order_confirmation: Option<String>,
    comments: Option<String>,
    order_status: Option<String>,
    process_order: Option<bool>,
    order_packed: Option<bool>,
    order_cancelled: Option<bool>,
    delivered: Option<bool>,
    is_rto: Option<bool>,
    is_return: Option<bool>,
    rto_reason: Option<String>,
    return_reason: Option<String>,
    cancel_reason: Option<String>,
    review: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualItem {
    product_id: Option<i32>,
    product_code: Option<String>,
    #[serde(default, deserialize_with = "opt_list")]
    selected_colors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_list")]
    selected_sizes: Option<Vec<String>>,
    quantity: Option<i32>,
    unit_price: Option<Decimal>,
}

fn from_manual(payload: ManualOrderPayload) -> AppResult<NormalizedOrder> {
    let order_id = clean(payload.order_id);
    let customer_name = clean(payload.customer_name);
    let contact_no = clean(payload.contact_no);
    let raw_items = payload.order_items.unwrap_or_default();

    let mut missing = Vec::new();
    if order_id.is_none() {
        missing.push("orderId");
    }
    if customer_name.is_none() {
        missing.push("customerName");
    }
    if contact_no.is_none() {
        missing.push("contactNo");
    }
    if raw_items.is_empty() {
        missing.push("orderItems");
    }
    if !missing.is_empty() {
        return Err(AppError::missing_fields(&missing));
    }

    let items = raw_items
        .into_iter()
        .enumerate()
        .map(|(index, item)| manual_item(index, item))
        .collect::<AppResult<Vec<_>>>()?;

    let order_date = match clean(payload.date) {
        Some(raw) => parse_date(&raw).ok_or_else(|| {
            AppError::Validation(format!("date {raw:?} is not YYYY-MM-DD"))
        })?,
        None => today(),
    };

    let payment_mode = match clean(payload.payment_mode) {
        None => PaymentMode::Paid,
        Some(mode) if mode.eq_ignore_ascii_case("PAID") => PaymentMode::Paid,
        Some(mode) if mode.eq_ignore_ascii_case("COD") => PaymentMode::Cod,
        Some(mode) => {
            return Err(AppError::Validation(format!(
                "paymentMode {mode:?} must be PAID or COD"
            )));
        }
    };

    let state = clean(payload.state);

    Ok(NormalizedOrder {
        source: OrderSource::Manual,
        order: OrderVariables {
            order_id: order_id.unwrap_or_default(),
            customer: CustomerInput {
                name: customer_name.unwrap_or_default(),
                contact_no: contact_no.unwrap_or_default(),
                shopify_customer_id: clean(payload.shopify_customer_id),
                email: clean(payload.email),
                address: clean(payload.address),
                city: clean(payload.city),
                country: clean(payload.country),
                state: state.clone(),
            },
            order_date,
            state,
            items,
            total_amount: payload.total_amount.unwrap_or(Decimal::ZERO),
            payment_mode,
            order_confirmation: payload.order_confirmation.unwrap_or_default(),
            comments: payload.comments.unwrap_or_default(),
            order_status: clean(payload.order_status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            flags: WorkflowFlags {
                process_order: payload.process_order.unwrap_or(false),
                order_packed: payload.order_packed.unwrap_or(false),
                order_cancelled: payload.order_cancelled.unwrap_or(false),
                delivered: payload.delivered.unwrap_or(false),
                is_rto: payload.is_rto.unwrap_or(false),
                is_return: payload.is_return.unwrap_or(false),
            },
            rto_reason: clean(payload.rto_reason),
            return_reason: clean(payload.return_reason),
            cancel_reason: clean(payload.cancel_reason),
            review: clean(payload.review),
        },
    })
}

fn manual_item(index: usize, item: ManualItem) -> AppResult<OrderItemInput> {
    let invalid = |what: &str| AppError::Validation(format!("orderItems[{index}]: {what}"));

    let product = match (item.product_id, clean(item.product_code)) {
        (Some(id), _) => ProductRef::Id(id),
        (None, Some(code)) => ProductRef::Code(code.to_ascii_uppercase()),
        (None, None) => return Err(invalid("productId or productCode is required")),
    };

    let selected_colors = non_blank(item.selected_colors.unwrap_or_default());
    if selected_colors.is_empty() {
        return Err(invalid("selectedColors must not be empty"));
    }
    let selected_sizes = non_blank(item.selected_sizes.unwrap_or_default());
    if selected_sizes.is_empty() {
        return Err(invalid("selectedSizes must not be empty"));
    }

    let quantity = item.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(invalid("quantity must be positive"));
    }
    let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
    if unit_price.is_sign_negative() {
        return Err(invalid("unitPrice must not be negative"));
    }

    Ok(OrderItemInput {
        product,
        selected_colors,
        selected_sizes,
        quantity,
        unit_price,
    })
}

/// `"Black / XL"` → `("Black", "XL")`; anything but two non-empty parts is rejected.
fn split_variant_title(title: Option<&str>) -> Option<(String, String)> {
    let parts: Vec<&str> = title?.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [color, size] if !color.is_empty() && !size.is_empty() => {
            Some((color.to_string(), size.to_string()))
        }
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Accepts `"9876543210"` and `9876543210` alike.
fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected string or number, got {other}"
            )));
        }
    })
}

/// Accepts `["Black", "Red"]` or a comma separated `"Black, Red"`.
fn opt_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
        OneOrMany::Many(list) => list,
        OneOrMany::One(joined) => joined.split(',').map(str::to_string).collect(),
    }))
}
