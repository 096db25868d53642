//! Marketplace isolation
//!
//! GREEN when:
//! - a login, fetch or apply failure on one binding becomes that binding's
//!   outcome and the next binding still runs to completion;
//! - the failed binding gets no audit record;
//! - the taxonomy code reported by the adapter is carried on the outcome.

use msync_errors::ErrorCode;
use msync_orchestrator::{AdapterError, AdapterRegistry, SyncOrchestrator};
use msync_schemas::Marketplace;
use msync_testkit::*;

type Orch = SyncOrchestrator<MemoryCatalogRepository, MemoryCredentialStore, MemoryAuditSink>;

fn orchestrator(log: &CallLog, baemin: ScriptedMarketplace) -> Orch {
    let store = two_marketplace_store();
    let adapters = AdapterRegistry::new()
        .with(Box::new(baemin))
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone())));
    SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new().with_log(log.clone()),
        sample_rules(),
        adapters,
    )
}

#[test]
fn scenario_rejected_login_does_not_block_other_marketplace() {
    let log = CallLog::new();
    let baemin = ScriptedMarketplace::new(Marketplace::Baemin, log.clone())
        .rejecting_login("SHOP-B", ErrorCode::AuthInvalid);
    let mut orch = orchestrator(&log, baemin);
    let store = two_marketplace_store();

    let outcomes = orch.sync_store(&store, &canonical_items(), "tester").unwrap();
    assert_eq!(outcomes.len(), 2);

    let b = &outcomes[0];
    assert_eq!(b.marketplace, Marketplace::Baemin);
    assert!(!b.applied);
    assert_eq!(b.error_code, Some(ErrorCode::AuthInvalid));
    assert_eq!(b.result.errors, vec!["AUTH_INVALID: portal refused login".to_string()]);
    assert!(b.summary.is_empty());

    let y = &outcomes[1];
    assert_eq!(y.marketplace, Marketplace::Yogiyo);
    assert!(y.applied);
    assert_eq!(y.error_code, None);
    assert_eq!(y.summary.updated, vec!["I1".to_string(), "I2".to_string()]);

    assert!(log.matching("BAEMIN:fetch").is_empty());
    assert_eq!(log.matching("YOGIYO:apply"), vec!["YOGIYO:apply:SHOP-Y".to_string()]);

    let audit = orch.audit().records();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].entity, "YOGIYO:SHOP-Y");
    assert_eq!(audit[0].actor, "tester");
}

#[test]
fn scenario_fetch_timeout_reported_and_next_binding_runs() {
    let log = CallLog::new();
    let baemin = ScriptedMarketplace::new(Marketplace::Baemin, log.clone())
        .failing_fetch(AdapterError::classified(ErrorCode::Timeout, "page load timed out"));
    let mut orch = orchestrator(&log, baemin);

    let outcomes = orch
        .sync_store(&two_marketplace_store(), &canonical_items(), "tester")
        .unwrap();

    assert_eq!(outcomes[0].error_code, Some(ErrorCode::Timeout));
    assert_eq!(
        outcomes[0].descriptor().map(|d| d.user_hint),
        Some("Check the network connection.")
    );
    assert!(log.matching("BAEMIN:apply").is_empty());
    assert!(outcomes[1].applied);
}

#[test]
fn scenario_unclassified_apply_error_has_no_code() {
    let log = CallLog::new();
    let baemin = ScriptedMarketplace::new(Marketplace::Baemin, log.clone())
        .failing_apply(AdapterError::unclassified("browser crashed"));
    let mut orch = orchestrator(&log, baemin);

    let outcomes = orch
        .sync_store(&two_marketplace_store(), &canonical_items(), "tester")
        .unwrap();

    let b = &outcomes[0];
    assert!(!b.applied);
    assert_eq!(b.error_code, None);
    assert_eq!(b.result.message, "browser crashed");
    // the diff ran before apply, so the summary is populated
    assert_eq!(b.summary.updated.len(), 2);

    let entities: Vec<&str> = orch.audit().records().iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(entities, vec!["YOGIYO:SHOP-Y"]);
}
