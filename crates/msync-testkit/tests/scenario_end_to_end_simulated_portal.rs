//! End-to-end against file-backed collaborators
//!
//! Simulated marketplaces + file catalog repository + hash-chained audit log,
//! all under one temp dir.
//!
//! GREEN when:
//! - the first sync pushes the whole catalog and both portals hold it;
//! - a second identical sync sends an empty delta (idempotence);
//! - a price edit reaches the portals as a targeted update;
//! - the audit log has one record per binding per sync and its chain verifies;
//! - a wrong username on one portal fails only that binding.

use msync_adapter_sim::SimulatedMarketplace;
use msync_audit::{load_recent, verify_hash_chain, AuditWriter, VerifyResult};
use msync_errors::ErrorCode;
use msync_orchestrator::{AdapterRegistry, MarketplaceAdapter, SyncOrchestrator};
use msync_schemas::{Marketplace, Store};
use msync_store::{CatalogRepository, FileCatalogRepository};
use msync_testkit::*;
use std::path::Path;

fn portal(m: Marketplace, state_dir: &Path, store: &Store, username: &str) -> SimulatedMarketplace {
    let mut p = SimulatedMarketplace::new(m, "v1", state_dir).unwrap();
    for b in store.bindings.iter().filter(|b| b.marketplace == m) {
        p.register_credentials(b.shop_id.clone(), username);
    }
    p
}

#[test]
fn scenario_sync_twice_then_edit_price() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("marketplaces");
    let audit_path = dir.path().join("audit").join("audit.jsonl");
    let store = two_marketplace_store();

    let adapters = AdapterRegistry::new()
        .with(Box::new(portal(Marketplace::Baemin, &state_dir, &store, "baemin_main-user")))
        .with(Box::new(portal(Marketplace::Yogiyo, &state_dir, &store, "yogiyo_main-user")));
    let mut orch = SyncOrchestrator::new(
        FileCatalogRepository::new(dir.path().join("catalog")).unwrap(),
        credentials_for(&store),
        AuditWriter::new(&audit_path, true).unwrap(),
        sample_rules(),
        adapters,
    );

    // first run: everything is new remotely
    let first = orch.sync_store(&store, &canonical_items(), "alice").unwrap();
    assert!(first.iter().all(|o| o.applied), "{first:?}");
    assert!(first.iter().all(|o| o.summary.updated.len() == 2));

    // second run: nothing to do
    let second = orch.sync_store(&store, &canonical_items(), "alice").unwrap();
    assert!(second.iter().all(|o| o.applied && o.summary.is_empty()), "{second:?}");

    // third run: one price edit
    let mut edited = canonical_items();
    edited[0].price = 9500;
    let third = orch.sync_store(&store, &edited, "alice").unwrap();
    for o in &third {
        assert!(o.applied);
        assert!(o.summary.updated.is_empty());
        assert_eq!(o.summary.price_changed.len(), 1);
        assert_eq!(o.summary.price_changed[0].old_price, 9000);
        assert_eq!(o.summary.price_changed[0].new_price, 9500);
    }

    // portal state reflects the edit
    let mut check = SimulatedMarketplace::new(Marketplace::Baemin, "v1", &state_dir).unwrap();
    let session = check
        .login(&store.bindings[0], "baemin_main-user", "pw")
        .unwrap();
    let remote = check.fetch_snapshot(&session).unwrap();
    assert_eq!(remote.items.len(), 2);
    assert_eq!(remote.items[0].price, 9500);

    // catalog snapshot is the last canonical list
    let saved = orch.catalog().load_snapshot("store-1").unwrap().unwrap();
    assert_eq!(saved.items, edited);

    // 3 syncs x 2 bindings
    assert_eq!(load_recent(&audit_path, 100).unwrap().len(), 6);
    assert_eq!(
        verify_hash_chain(&audit_path).unwrap(),
        VerifyResult::Valid { lines: 6 }
    );
}

#[test]
fn scenario_wrong_username_fails_one_portal() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("marketplaces");
    let audit_path = dir.path().join("audit.jsonl");
    let store = two_marketplace_store();

    let adapters = AdapterRegistry::new()
        .with(Box::new(portal(Marketplace::Baemin, &state_dir, &store, "someone-else")))
        .with(Box::new(portal(Marketplace::Yogiyo, &state_dir, &store, "yogiyo_main-user")));
    let mut orch = SyncOrchestrator::new(
        FileCatalogRepository::new(dir.path().join("catalog")).unwrap(),
        credentials_for(&store),
        AuditWriter::new(&audit_path, true).unwrap(),
        sample_rules(),
        adapters,
    );

    let outcomes = orch.sync_store(&store, &canonical_items(), "alice").unwrap();
    assert_eq!(outcomes[0].error_code, Some(ErrorCode::AuthInvalid));
    assert_eq!(outcomes[0].result.message, "AUTH_INVALID: username mismatch");
    assert!(outcomes[1].applied);

    let records = load_recent(&audit_path, 10).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entity, "YOGIYO:SHOP-Y");
}
