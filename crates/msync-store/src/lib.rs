//! msync-store
//!
//! Catalog repository: the persisted copy of each store's canonical catalog.

use anyhow::{bail, Context, Result};
use msync_schemas::CatalogSnapshot;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persistence for canonical catalog snapshots, keyed by store id.
///
/// One writer per store id; callers serialise saves for the same store.
pub trait CatalogRepository {
    /// Replace the stored snapshot for `snapshot.store_id`.
    fn save_snapshot(&mut self, snapshot: &CatalogSnapshot) -> Result<()>;
    /// `None` when nothing was ever saved for `store_id`.
    fn load_snapshot(&self, store_id: &str) -> Result<Option<CatalogSnapshot>>;
}

/// One pretty-printed JSON document per store under `root`.
#[derive(Clone, Debug)]
pub struct FileCatalogRepository {
    root: PathBuf,
}

impl FileCatalogRepository {
    /// Creates `root` if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("create_dir_all {:?}", root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, store_id: &str) -> Result<PathBuf> {
        let ok = !store_id.is_empty()
            && store_id != "."
            && store_id != ".."
            && !store_id.contains(['/', '\\']);
        if !ok {
            bail!("CATALOG_INVALID_STORE_ID: '{store_id}' cannot name a snapshot file");
        }
        Ok(self.root.join(format!("{store_id}.json")))
    }
}

impl CatalogRepository for FileCatalogRepository {
    fn save_snapshot(&mut self, snapshot: &CatalogSnapshot) -> Result<()> {
        let path = self.path_for(&snapshot.store_id)?;
        let body = serde_json::to_vec_pretty(snapshot).context("serialize catalog snapshot")?;

        // temp + rename: readers see the old or the new document, never half.
        let tmp = path.with_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp)
                .with_context(|| format!("create {:?}", tmp))?;
            f.write_all(&body)
                .with_context(|| format!("write {:?}", tmp))?;
            f.sync_all().with_context(|| format!("fsync {:?}", tmp))?;
        }
        fs::rename(&tmp, &path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;

        debug!(
            store_id = %snapshot.store_id,
            items = snapshot.items.len(),
            "catalog snapshot saved"
        );
        Ok(())
    }

    fn load_snapshot(&self, store_id: &str) -> Result<Option<CatalogSnapshot>> {
        let path = self.path_for(store_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&path).with_context(|| format!("read {:?}", path))?;
        let snap = serde_json::from_slice(&raw)
            .with_context(|| format!("parse catalog snapshot {:?}", path))?;
        Ok(Some(snap))
    }
}
