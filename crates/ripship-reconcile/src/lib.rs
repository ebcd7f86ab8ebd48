//! Rip & ship inventory reconciliation.
//!
//! For each order line item whose product carries a master-SKU metafield,
//! the platform's automatic deduction on the sold SKU is reversed and the
//! same quantity is taken from the master SKU instead, never driving the
//! master below zero. Orders with at least one such item are then tagged.

pub mod error;
pub mod process;
pub mod reconciler;
pub mod resolver;
pub mod settings;
pub mod tagger;

pub use error::{ReconcileError, Stage};
pub use process::{process_order, OrderReport};
pub use reconciler::{clamp_deduction, Adjustment, Reconciler};
pub use resolver::{ReconcileTarget, Resolution, Resolver};
pub use settings::ReconcileSettings;
pub use tagger::{TagOutcome, Tagger};
