//! Test doubles and fixtures for scenario tests.
//!
//! Nothing here is wired into the `msync` binary.

mod fixtures;
mod memory;
mod scripted;

pub use fixtures::{
    canonical_items, credentials_for, sample_rules, two_marketplace_store, SAMPLE_RULES_JSON,
};
pub use memory::{CallLog, MemoryAuditSink, MemoryCatalogRepository, MemoryCredentialStore};
pub use scripted::ScriptedMarketplace;
