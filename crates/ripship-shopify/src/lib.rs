//! Shopify Admin API access for the reconciler.
//!
//! [`CommerceApi`] is the seam the reconciliation logic is written against;
//! [`ShopifyAdminClient`] is the production implementation.

pub mod api;
pub mod client;
pub mod error;
#[cfg(feature = "test-util")]
pub mod fake;
pub mod types;

pub use api::CommerceApi;
pub use client::ShopifyAdminClient;
pub use error::ShopifyError;
pub use types::Variant;
