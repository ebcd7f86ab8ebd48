use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("invalid store URL \"{store}\": {reason}")]
    InvalidStoreUrl { store: String, reason: String },

    #[error("invalid id in {context}: \"{value}\"")]
    InvalidId { context: String, value: String },
}
