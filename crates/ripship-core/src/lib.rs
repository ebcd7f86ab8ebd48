//! Shared configuration and webhook payload types for the rip & ship
//! inventory reconciler.

pub mod app_config;
pub mod config;
pub mod order;
pub mod tags;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use order::{LineItem, Order, ReconcilableItem};
pub use tags::{has_tag, parse_tags, with_tag};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
