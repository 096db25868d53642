//! Cancellation and configuration defects
//!
//! # Invariants under test
//!
//! 1. A token cancelled before the run yields cancelled outcomes for every
//!    binding and touches nothing (no catalog save, no adapter call, no audit).
//! 2. Cancelling mid-run stops at the next step boundary; later bindings are
//!    reported cancelled without a login.
//! 3. An unregistered adapter, missing rules or an unknown credential ref
//!    fail the whole request before anything is persisted.

use msync_errors::ErrorCode;
use msync_orchestrator::{AdapterRegistry, CancelToken, SyncOrchestrator, CANCELLED_MESSAGE};
use msync_rules::RuleBook;
use msync_schemas::Marketplace;
use msync_testkit::*;

#[test]
fn scenario_cancel_before_start_touches_nothing() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let adapters = AdapterRegistry::new()
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Baemin, log.clone())))
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone())));
    let token = CancelToken::new();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new(),
        sample_rules(),
        adapters,
    )
    .with_cancel_token(token.clone());

    token.cancel();
    let outcomes = orch.sync_store(&store, &canonical_items(), "alice").unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_cancelled() && !o.applied));
    assert!(outcomes.iter().all(|o| o.error_code.is_none()));
    assert!(log.entries().is_empty());
    assert_eq!(orch.catalog().save_count(), 0);
    assert!(orch.audit().records().is_empty());
}

#[test]
fn scenario_cancel_mid_run_stops_at_next_boundary() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let token = CancelToken::new();
    let baemin = ScriptedMarketplace::new(Marketplace::Baemin, log.clone())
        .cancelling_after_login(token.clone());
    let adapters = AdapterRegistry::new()
        .with(Box::new(baemin))
        .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone())));
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new(),
        sample_rules(),
        adapters,
    )
    .with_cancel_token(token);

    let outcomes = orch.sync_store(&store, &canonical_items(), "alice").unwrap();

    assert_eq!(log.entries(), vec!["catalog:save:store-1", "BAEMIN:login:SHOP-B"]);
    assert!(outcomes[0].is_cancelled());
    assert!(outcomes[1].is_cancelled());
    assert_eq!(outcomes[1].result.message, CANCELLED_MESSAGE);
    assert!(orch.audit().records().is_empty());

    // the shared token stays tripped
    assert!(orch.cancel_token().is_cancelled());
}

#[test]
fn scenario_unregistered_adapter_is_fatal() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new(),
        sample_rules(),
        AdapterRegistry::new()
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Baemin, log.clone()))),
    );

    let err = orch
        .sync_store(&store, &canonical_items(), "alice")
        .unwrap_err();
    assert!(err.to_string().starts_with("ADAPTER_NOT_REGISTERED: no adapter for YOGIYO"));
    // preflight covers all bindings before the catalog is saved
    assert!(log.entries().is_empty());
}

#[test]
fn scenario_missing_rules_is_fatal() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let baemin_only = RuleBook::from_json_str(
        r#"{ "platforms": { "BAEMIN": {
            "price": { "min": 0, "step": 10 },
            "name": { "maxLen": 30 },
            "desc": { "maxLen": 200 },
            "optionGroup": { "minSelect": 0, "maxSelect": 10, "maxGroupsPerItem": 5 },
            "option": { "maxOptionsPerGroup": 20 }
        } } }"#,
    )
    .unwrap();
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        credentials_for(&store),
        MemoryAuditSink::new(),
        baemin_only,
        AdapterRegistry::new()
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Baemin, log.clone())))
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone()))),
    );

    let err = orch
        .sync_store(&store, &canonical_items(), "alice")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "RULES_MARKETPLACE_MISSING: no rules defined for YOGIYO"
    );
    assert!(log.entries().is_empty());
}

#[test]
fn scenario_unknown_credential_ref_is_fatal() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let mut creds = credentials_for(&store);
    creds.remove("yogiyo_main");

    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new().with_log(log.clone()),
        creds,
        MemoryAuditSink::new(),
        sample_rules(),
        AdapterRegistry::new()
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Baemin, log.clone())))
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone()))),
    );

    let err = orch
        .toggle_pause(
            &store,
            &msync_schemas::PauseCommand {
                store_id: "store-1".into(),
                paused: false,
                reason: None,
                until: None,
            },
            "alice",
        )
        .unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("resolve credentials for YOGIYO:SHOP-Y"), "{rendered}");
    assert!(rendered.contains("CREDENTIAL_NOT_FOUND"), "{rendered}");
    assert!(log.entries().is_empty());
}

#[test]
fn scenario_login_codes_survive_for_rendering() {
    let log = CallLog::new();
    let store = two_marketplace_store();
    let baemin = ScriptedMarketplace::new(Marketplace::Baemin, log.clone())
        .rejecting_login("SHOP-B", ErrorCode::Auth2faRequired);
    let mut orch = SyncOrchestrator::new(
        MemoryCatalogRepository::new(),
        credentials_for(&store),
        MemoryAuditSink::new(),
        sample_rules(),
        AdapterRegistry::new()
            .with(Box::new(baemin))
            .with(Box::new(ScriptedMarketplace::new(Marketplace::Yogiyo, log.clone()))),
    );

    let outcomes = orch.sync_store(&store, &canonical_items(), "alice").unwrap();
    let d = outcomes[0].descriptor().unwrap();
    assert_eq!(d.code, ErrorCode::Auth2faRequired);
    assert_eq!(d.user_hint, "Enter the second-factor code to continue.");
}
