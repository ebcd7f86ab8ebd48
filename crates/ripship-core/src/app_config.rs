use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration, built once at startup and shared by `Arc`.
///
/// Secrets are only ever read from the environment; see
/// [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub webhook_secret: String,
    /// Store origin, always with a scheme (e.g. `https://example.myshopify.com`).
    pub store_url: String,
    pub access_token: String,
    pub location_id: u64,
    pub api_version: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub metafield_namespace: String,
    pub metafield_key: String,
    pub order_tag: String,
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("webhook_secret", &"[redacted]")
            .field("store_url", &self.store_url)
            .field("access_token", &"[redacted]")
            .field("location_id", &self.location_id)
            .field("api_version", &self.api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("metafield_namespace", &self.metafield_namespace)
            .field("metafield_key", &self.metafield_key)
            .field("order_tag", &self.order_tag)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
