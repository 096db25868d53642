//! msync-rules
//!
//! Per-marketplace rule schema and the validation engine that gates every
//! apply.
//!
//! - Rule book parsed into typed sections at load time (fail fast on unknown
//!   marketplaces, missing or unknown keys, non-positive price step).
//! - Validation is exhaustive: every item against every applicable rule,
//!   all violations collected in a deterministic order.
//!
//! The engine is a generic evaluator. Marketplace thresholds live in the
//! rules file only.

mod engine;
mod types;

pub use engine::validate_items;
pub use types::*;
