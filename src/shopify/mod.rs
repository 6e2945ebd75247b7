//! Shopify Admin REST integration.
//!
//! [`ShopifyClient`] talks to the API, [`types`] holds the wire shapes and
//! [`status`] translates shipment statuses into internal order statuses.

pub mod client;
pub mod error;
pub mod status;
pub mod types;

pub use client::{OrderFilter, Page, ShopifyClient};
pub use error::ShopifyError;
