//! Wire types for the Shopify Admin REST resources we consume.
//!
//! Only the fields the sync path reads are modelled; everything else in the
//! payload is ignored. Shopify sends explicit `null` for empty collections on
//! some API versions, so collection fields go through [`null_as_default`].

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Gateway name Shopify reports for cash-on-delivery checkouts.
pub const COD_GATEWAY: &str = "Cash on Delivery (COD)";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyOrder {
    pub id: i64,
    pub order_number: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_gateway_names: Vec<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fulfillments: Vec<ShopifyFulfillment>,
    #[serde(default)]
    pub customer: Option<ShopifyCustomer>,
    #[serde(default)]
    pub billing_address: Option<ShopifyAddress>,
    #[serde(default)]
    pub shipping_address: Option<ShopifyAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<ShopifyLineItem>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ShopifyOrder {
    pub fn is_cash_on_delivery(&self) -> bool {
        self.payment_gateway_names
            .first()
            .is_some_and(|gateway| gateway == COD_GATEWAY)
    }

    /// Order phone, else the customer's, else the billing address's.
    pub fn contact_phone(&self) -> Option<String> {
        let non_blank = |phone: Option<&String>| {
            phone
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
        };
        non_blank(self.phone.as_ref())
            .or_else(|| non_blank(self.customer.as_ref().and_then(|c| c.phone.as_ref())))
            .or_else(|| non_blank(self.billing_address.as_ref().and_then(|a| a.phone.as_ref())))
    }

    /// Shipment status of the most recent fulfillment that reported one.
    pub fn latest_shipment_status(&self) -> Option<&str> {
        self.fulfillments
            .iter()
            .rev()
            .find_map(|f| f.shipment_status.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyCustomer {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Shopify reports the account state here (`enabled`, `disabled`, ...),
    /// older storefront exports put the province in it instead.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub default_address: Option<ShopifyAddress>,
}

impl ShopifyCustomer {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ShopifyAddress {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

impl ShopifyAddress {
    /// `address1, address2, zip` with blanks dropped.
    pub fn street(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.address1, &self.address2, &self.zip]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default = "one")]
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyFulfillment {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub shipment_status: Option<String>,
}

fn one() -> i32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tolerates_null_collections_and_string_prices() {
        let order: ShopifyOrder = serde_json::from_value(json!({
            "id": 1,
            "order_number": 1001,
            "total_price": "499.00",
            "payment_gateway_names": null,
            "fulfillments": null,
            "line_items": [{ "sku": "MTSH09-BLK-M", "price": "499.00" }]
        }))
        .expect("order");

        assert!(order.payment_gateway_names.is_empty());
        assert!(order.fulfillments.is_empty());
        assert_eq!(order.line_items[0].quantity, 1);
        assert_eq!(order.total_price, Some(Decimal::new(49900, 2)));
    }

    #[test]
    fn detects_cash_on_delivery_from_first_gateway() {
        let mut order: ShopifyOrder = serde_json::from_value(json!({
            "id": 1,
            "order_number": 1001,
            "payment_gateway_names": [COD_GATEWAY, "razorpay"]
        }))
        .expect("order");
        assert!(order.is_cash_on_delivery());

        order.payment_gateway_names = vec!["razorpay".into(), COD_GATEWAY.into()];
        assert!(!order.is_cash_on_delivery());
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let customer: ShopifyCustomer =
            serde_json::from_value(json!({ "id": 7, "first_name": "Jane", "last_name": null }))
                .expect("customer");
        assert_eq!(customer.full_name(), "Jane");
    }
}
