//! Command handler modules for the `msync` console.
//!
//! Shared bootstrap (config, store document, orchestrator wiring) lives here.
//! Command-specific logic lives in the submodules.

pub mod audit;
pub mod render;
pub mod sync;

use anyhow::{Context, Result};
use msync_adapter_sim::SimulatedMarketplace;
use msync_audit::AuditWriter;
use msync_config::{
    report_unused_keys, CredentialStore, EnvCredentialStore, SyncConfig, UnusedKeyPolicy,
};
use msync_orchestrator::{AdapterRegistry, SyncOrchestrator};
use msync_rules::RuleBook;
use msync_schemas::StoreDocument;
use msync_store::FileCatalogRepository;
use std::fs;
use tracing::{info, warn};

/// Selector version reported when config does not pin one.
const DEFAULT_SELECTOR_VERSION: &str = "v1";

pub type Orchestrator = SyncOrchestrator<FileCatalogRepository, EnvCredentialStore, AuditWriter>;

pub struct ConfigArgs {
    pub paths: Vec<String>,
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config, report unused keys and parse the typed view.
pub fn load_config(args: &ConfigArgs) -> Result<SyncConfig> {
    let path_refs: Vec<&str> = args.paths.iter().map(|s| s.as_str()).collect();
    let loaded = msync_config::load_layered_yaml(&path_refs)?;

    let policy = if args.strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(&loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            unused_leaf_keys = report.unused_leaf_pointers.len(),
            "CONFIG_UNUSED_KEYS"
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            warn!(unused = %p, "unused config key");
        }
    }

    info!(config_hash = %loaded.config_hash, "config loaded");
    loaded.sync_config()
}

pub fn read_store_document(cfg: &SyncConfig) -> Result<StoreDocument> {
    let path = &cfg.paths.store_file;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("STORE_FILE_READ_FAILED: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("STORE_FILE_INVALID: {}", path.display()))
}

/// Wire file-backed collaborators and one simulated adapter per configured
/// marketplace.
///
/// Each simulated portal expects the usernames the credential store resolves
/// for the store's bindings. Refs that do not resolve are left for preflight
/// to report.
pub fn bootstrap(cfg: &SyncConfig, document: &StoreDocument) -> Result<Orchestrator> {
    let rules = RuleBook::load(&cfg.paths.rules_file)?;
    let credentials = EnvCredentialStore::from_config(cfg);

    let mut adapters = AdapterRegistry::new();
    for marketplace in cfg.marketplaces.keys().copied() {
        let selector = cfg
            .selector_version(marketplace)
            .unwrap_or(DEFAULT_SELECTOR_VERSION);
        let mut portal =
            SimulatedMarketplace::new(marketplace, selector, &cfg.paths.marketplace_state_dir)
                .with_context(|| format!("init simulated {marketplace} adapter"))?;

        for binding in document
            .store
            .bindings
            .iter()
            .filter(|b| b.marketplace == marketplace)
        {
            if let Ok(cred) = credentials.load(&binding.credential_ref) {
                portal.register_credentials(binding.shop_id.clone(), cred.username());
            }
        }
        adapters.register(Box::new(portal));
    }

    let catalog = FileCatalogRepository::new(&cfg.paths.catalog_dir)?;
    let audit = AuditWriter::open(&cfg.paths.audit_log, cfg.audit.hash_chain)?;

    info!(
        store_id = %document.store.id,
        marketplaces = ?adapters.marketplaces(),
        "console wired"
    );
    Ok(SyncOrchestrator::new(catalog, credentials, audit, rules, adapters))
}

/// `msync explain <CODE>`
pub fn explain(code: &str) -> Result<()> {
    let d = msync_errors::lookup(code.trim())?;
    println!("code={}", d.code);
    println!("severity={}", d.severity);
    println!("recovery={}", d.recovery);
    println!("cause={}", d.cause);
    println!("hint={}", d.user_hint);
    Ok(())
}
