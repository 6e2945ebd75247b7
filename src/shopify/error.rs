//! Shopify client errors.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The request did not complete within the configured bound.
    #[error("request exceeded {0:?}")]
    Timeout(Duration),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
