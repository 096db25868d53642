use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use msync_audit::{AuditRecord, AuditSink};
use msync_config::{Credential, CredentialStore};
use msync_schemas::CatalogSnapshot;
use msync_store::CatalogRepository;

/// Ordered trace of calls shared between fakes, e.g. `catalog:save:store-1`
/// or `BAEMIN:apply:SHOP-B`.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        let mut guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        guard.push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Entries containing `needle`, in call order.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.contains(needle))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore {
    creds: BTreeMap<String, Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, credential_ref: impl Into<String>, credential: Credential) {
        self.creds.insert(credential_ref.into(), credential);
    }

    pub fn remove(&mut self, credential_ref: &str) {
        self.creds.remove(credential_ref);
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, credential_ref: &str) -> Result<Credential> {
        match self.creds.get(credential_ref) {
            Some(c) => Ok(c.clone()),
            None => bail!("CREDENTIAL_NOT_FOUND: unknown credential ref '{credential_ref}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MemoryCatalogRepository {
    snapshots: BTreeMap<String, CatalogSnapshot>,
    saves: usize,
    fail_saves: bool,
    log: Option<CallLog>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Every save returns `Err` (disk full, permissions, ...).
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CatalogRepository for MemoryCatalogRepository {
    fn save_snapshot(&mut self, snapshot: &CatalogSnapshot) -> Result<()> {
        if self.fail_saves {
            bail!("simulated catalog write failure");
        }
        if let Some(log) = &self.log {
            log.push(format!("catalog:save:{}", snapshot.store_id));
        }
        self.saves += 1;
        self.snapshots
            .insert(snapshot.store_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load_snapshot(&self, store_id: &str) -> Result<Option<CatalogSnapshot>> {
        Ok(self.snapshots.get(store_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MemoryAuditSink {
    records: Vec<AuditRecord>,
    fail_appends: bool,
    log: Option<CallLog>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&mut self, record: AuditRecord) -> Result<AuditRecord> {
        if self.fail_appends {
            bail!("simulated audit write failure");
        }
        if let Some(log) = &self.log {
            log.push(format!("audit:{}:{}", record.action, record.entity));
        }
        self.records.push(record.clone());
        Ok(record)
    }
}
