pub mod batch_service;
pub mod catalog;
pub mod customer_service;
pub mod normalizer;
pub mod order_service;
pub mod shopify_service;
pub mod sync_service;
