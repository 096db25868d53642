//! msync-diff
//!
//! Catalog reconciliation: computes the minimal change set between the
//! canonical catalog and one marketplace's last-fetched items.
//!
//! - Items missing remotely are sent as full replacements.
//! - Price and availability drift become targeted updates.
//! - Name/description drift becomes a full replacement.
//! - Remote-only items are left alone (no deletion propagation).
//!
//! Deterministic, pure logic. No IO. No marketplace calls.

mod engine;
mod types;

pub use engine::compute_delta;
pub use types::*;
