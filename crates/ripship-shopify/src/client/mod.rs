//! HTTP client for the Shopify Admin REST API.

mod inventory;
mod orders;
mod products;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use ripship_core::AppConfig;
use serde::de::DeserializeOwned;

use crate::api::CommerceApi;
use crate::error::ShopifyError;
use crate::types::Variant;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Retry-After fallback when Shopify omits the header on a 429.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Authenticated client for one store's Admin API.
///
/// Non-2xx responses become typed errors. Nothing is retried: a 429 comes
/// back as [`ShopifyError::RateLimited`] and the caller decides what to do.
pub struct ShopifyAdminClient {
    client: Client,
    access_token: String,
    /// `{store}/admin/api/{version}/`, always with a trailing slash.
    api_base: Url,
}

impl ShopifyAdminClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ShopifyError::InvalidStoreUrl`] if the store URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ShopifyError> {
        Self::with_base_url(
            &config.store_url,
            &config.access_token,
            &config.api_version,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client against an explicit store origin (a mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ShopifyError::InvalidStoreUrl`] if `store_url` does not parse.
    pub fn with_base_url(
        store_url: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let api_base = Self::api_base(store_url, api_version)?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            api_base,
        })
    }

    fn api_base(store_url: &str, api_version: &str) -> Result<Url, ShopifyError> {
        let base = format!(
            "{}/admin/api/{}/",
            store_url.trim_end_matches('/'),
            api_version.trim_matches('/')
        );
        let url = Url::parse(&base).map_err(|e| ShopifyError::InvalidStoreUrl {
            store: store_url.to_owned(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ShopifyError::InvalidStoreUrl {
                store: store_url.to_owned(),
                reason: "URL has no host".to_owned(),
            });
        }
        Ok(url)
    }

    /// Resolves an Admin API path (e.g. `"orders/1.json"`) against the base.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ShopifyError> {
        let mut url = self
            .api_base
            .join(path)
            .map_err(|e| ShopifyError::InvalidStoreUrl {
                store: self.api_base.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Attaches auth headers, sends, and maps non-2xx statuses to errors.
    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Response, ShopifyError> {
        let response = request
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::check_status(response, url)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn check_status(response: Response, url: &Url) -> Result<Response, ShopifyError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            // Shopify sends fractional seconds, e.g. "2.0".
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map_or(DEFAULT_RETRY_AFTER_SECS, |s| s.ceil() as u64);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ShopifyError> {
        let response = self.execute(self.client.get(url.clone()), &url).await?;
        Self::decode(response, context).await
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ShopifyError> {
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ShopifyError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[async_trait]
impl CommerceApi for ShopifyAdminClient {
    async fn product_metafield(
        &self,
        product_id: u64,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, ShopifyError> {
        self.get_product_metafield(product_id, namespace, key).await
    }

    async fn variant(&self, variant_id: u64) -> Result<Variant, ShopifyError> {
        self.get_variant(variant_id).await
    }

    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<Variant>, ShopifyError> {
        self.get_variant_by_sku(sku).await
    }

    async fn available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
    ) -> Result<Option<i64>, ShopifyError> {
        self.get_available(inventory_item_id, location_id).await
    }

    async fn adjust_available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
        delta: i64,
    ) -> Result<(), ShopifyError> {
        self.post_inventory_adjustment(inventory_item_id, location_id, delta)
            .await
    }

    async fn order_tags(&self, order_id: u64) -> Result<String, ShopifyError> {
        self.get_order_tags(order_id).await
    }

    async fn update_order_tags(&self, order_id: u64, tags: &str) -> Result<(), ShopifyError> {
        self.put_order_tags(order_id, tags).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
