use ripship_core::AppConfig;

/// The slice of configuration reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub location_id: u64,
    pub metafield_namespace: String,
    pub metafield_key: String,
    pub order_tag: String,
}

impl ReconcileSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            location_id: config.location_id,
            metafield_namespace: config.metafield_namespace.clone(),
            metafield_key: config.metafield_key.clone(),
            order_tag: config.order_tag.clone(),
        }
    }
}
