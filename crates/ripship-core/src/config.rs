use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// All parsing and validation lives here so it can be tested with a plain
/// `HashMap` lookup instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Blank secrets are treated the same as absent ones.
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let webhook_secret = require("SHOPIFY_WEBHOOK_SECRET")?;
    let store_url = normalize_store_url(&require("SHOPIFY_STORE_DOMAIN")?);
    let access_token = require("SHOPIFY_ACCESS_TOKEN")?;
    let location_id = require("SHOPIFY_LOCATION_ID")?
        .parse::<u64>()
        .map_err(|e| invalid("SHOPIFY_LOCATION_ID", e.to_string()))?;
    if location_id == 0 {
        return Err(invalid(
            "SHOPIFY_LOCATION_ID",
            "must be a positive integer".to_string(),
        ));
    }

    let env = parse_environment(&or_default("RIPSHIP_ENV", "development"))?;

    let bind_addr = or_default("RIPSHIP_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("RIPSHIP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("RIPSHIP_LOG_LEVEL", "info");
    let api_version = or_default("SHOPIFY_API_VERSION", "2024-10");
    let request_timeout_secs = parse_u64("RIPSHIP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RIPSHIP_USER_AGENT", "ripship/0.1 (inventory-reconciler)");
    let metafield_namespace = or_default("RIPSHIP_METAFIELD_NAMESPACE", "custom");
    let metafield_key = or_default("RIPSHIP_METAFIELD_KEY", "master_sku");
    let order_tag = or_default("RIPSHIP_ORDER_TAG", "rip-ship-reconciled")
        .trim()
        .to_string();
    if order_tag.is_empty() || order_tag.contains(',') {
        return Err(invalid(
            "RIPSHIP_ORDER_TAG",
            "must be non-empty and must not contain a comma".to_string(),
        ));
    }
    let max_body_bytes = parse_usize("RIPSHIP_MAX_BODY_BYTES", "1048576")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        webhook_secret,
        store_url,
        access_token,
        location_id,
        api_version,
        request_timeout_secs,
        user_agent,
        metafield_namespace,
        metafield_key,
        order_tag,
        max_body_bytes,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RIPSHIP_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

/// Accepts either a bare store domain (`example.myshopify.com`) or a full
/// URL and returns an origin with a scheme and no trailing slash.
fn normalize_store_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
