use ripship_shopify::ShopifyError;
use thiserror::Error;

/// The remote step that was running when a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metafield,
    Variant,
    MasterLookup,
    Reversal,
    ReadAvailable,
    Deduction,
    ReadTags,
    UpdateTags,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Metafield => write!(f, "metafield"),
            Stage::Variant => write!(f, "variant"),
            Stage::MasterLookup => write!(f, "master lookup"),
            Stage::Reversal => write!(f, "reversal"),
            Stage::ReadAvailable => write!(f, "read available"),
            Stage::Deduction => write!(f, "deduction"),
            Stage::ReadTags => write!(f, "read tags"),
            Stage::UpdateTags => write!(f, "update tags"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Shopify call failed during {stage}: {source}")]
    Api {
        stage: Stage,
        #[source]
        source: ShopifyError,
    },
}

impl ReconcileError {
    pub(crate) fn api(stage: Stage) -> impl FnOnce(ShopifyError) -> Self {
        move |source| Self::Api { stage, source }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Api { stage, .. } => *stage,
        }
    }
}
