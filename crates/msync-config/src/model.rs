use anyhow::{Context, Result};
use msync_schemas::Marketplace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Filesystem locations the service reads and writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Store definition: the store, its bindings and canonical items.
    pub store_file: PathBuf,
    /// Per-marketplace rule book.
    pub rules_file: PathBuf,
    /// Catalog repository root (one JSON document per store).
    pub catalog_dir: PathBuf,
    /// Audit JSONL file.
    pub audit_log: PathBuf,
    /// State directory of the simulated marketplaces.
    pub marketplace_state_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub hash_chain: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { hash_chain: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Actor recorded on audit lines written by the console.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
        }
    }
}

/// Per-marketplace adapter settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceSettings {
    /// Portal selector map version the adapter reports on its sessions.
    pub selector_version: String,
}

/// Env var NAMES holding one credential. Never the values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEnv {
    pub username_env: String,
    pub password_env: String,
}

/// Typed configuration of the sync service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub paths: PathsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub marketplaces: BTreeMap<Marketplace, MarketplaceSettings>,
    /// credential ref -> env var names
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialEnv>,
}

impl SyncConfig {
    /// Build from canonical config JSON (produced by `load_layered_yaml*`).
    ///
    /// Required: everything under `paths`. Optional: `audit.hash_chain`
    /// (default true), `console.actor` (default "operator"), `marketplaces`,
    /// `credentials`.
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        cfg.pointer("/paths")
            .context("CONFIG_INVALID: config missing paths section")?;
        serde_json::from_value(cfg.clone())
            .context("CONFIG_INVALID: config does not match the sync schema")
    }

    /// Selector version configured for `marketplace`, if any.
    pub fn selector_version(&self, marketplace: Marketplace) -> Option<&str> {
        self.marketplaces
            .get(&marketplace)
            .map(|m| m.selector_version.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_actor() -> String {
    "operator".to_string()
}
