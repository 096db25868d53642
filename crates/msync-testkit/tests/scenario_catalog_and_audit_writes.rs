//! Persistence ordering and infrastructure failures
//!
//! # Invariants under test
//!
//! 1. The canonical catalog is saved once, before the first binding runs.
//! 2. A catalog write failure aborts the sync before any adapter call.
//! 3. An audit write failure aborts the sync; the error names the entity.
//! 4. Audit records follow binding order and carry the acting operator.

use msync_audit::AuditAction;
use msync_orchestrator::{AdapterRegistry, SyncOrchestrator};
use msync_schemas::Marketplace;
use msync_store::CatalogRepository;
use msync_testkit::*;

fn adapters(log: &CallLog) -> AdapterRegistry {
    AdapterRegistry::new()
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Baemin, log.clone())))
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone())))
}

#[test]
fn scenario_catalog_saved_before_first_login() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new().with_log(log.clone()),
        sample_rules(),
        adapters(&log),
    );

    orch.sync_store(&store, &canonical_items(), "alice").unwrap();

    assert_eq!(
        log.entries(),
        vec![
            "catalog:save:store-1",
            "BAEMIN:login:SHOP-B",
            "BAEMIN:fetch:SHOP-B",
            "BAEMIN:apply:SHOP-B",
            "audit:APPLY:BAEMIN:SHOP-B",
            "YOGIYO:login:SHOP-Y",
            "YOGIYO:fetch:SHOP-Y",
            "YOGIYO:apply:SHOP-Y",
            "audit:APPLY:YOGIYO:SHOP-Y",
        ]
    );

    assert_eq!(orch.catalog().save_count(), 1);
    let saved = orch.catalog().load_snapshot("store-1").unwrap();
    assert_eq!(saved.map(|s| s.items), Some(canonical_items()));

    let audit = orch.audit().records();
    assert!(audit.iter().all(|r| r.actor == "alice" && r.action == AuditAction::Apply));
}

#[test]
fn scenario_catalog_failure_aborts_before_adapters() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::failing(),
        credentials_for(&store),
        MemoryAuditSink::new(),
        sample_rules(),
        adapters(&log),
    );

    let err = orch
        .sync_store(&store, &canonical_items(), "alice")
        .unwrap_err();
    assert!(format!("{err:#}").contains("persist canonical catalog for store store-1"));
    assert!(log.entries().is_empty());
}

#[test]
fn scenario_audit_failure_is_fatal() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new(),
        credentials_for(&store),
        MemoryAuditSink::failing(),
        sample_rules(),
        adapters(&log),
    );

    let err = orch
        .sync_store(&store, &canonical_items(), "alice")
        .unwrap_err();
    assert!(format!("{err:#}").contains("AUDIT_WRITE_FAILED: apply on BAEMIN:SHOP-B"));
    // the second binding never started
    assert!(log.matching("YOGIYO").is_empty());
}
