//! msync-audit
//!
//! Append-only audit trail for marketplace mutations. One record per
//! apply / pause / hours change, written as JSON Lines with an optional
//! SHA-256 hash chain.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Kind of mutation an audit record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Apply,
    Pause,
    Hours,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Apply => "APPLY",
            AuditAction::Pause => "PAUSE",
            AuditAction::Hours => "HOURS",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit line.
///
/// `entity` is `<MARKETPLACE>:<shop_id>`. `before` is always an empty object
/// today; prior remote state is not captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: AuditAction,
    pub entity: String,
    pub before: Value,
    pub after: Value,
    pub ts_utc: DateTime<Utc>,
    #[serde(default)]
    pub hash_prev: Option<String>,
    #[serde(default)]
    pub hash_self: Option<String>,
}

impl AuditRecord {
    /// Fresh record with a random id, stamped now, no chain fields.
    pub fn new(
        actor: impl Into<String>,
        action: AuditAction,
        entity: impl Into<String>,
        after: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: actor.into(),
            action,
            entity: entity.into(),
            before: Value::Object(serde_json::Map::new()),
            after,
            ts_utc: Utc::now(),
            hash_prev: None,
            hash_self: None,
        }
    }
}

/// Destination for audit records. Append-only, one record at a time.
pub trait AuditSink {
    /// Persist `record`, returning it as stored (chain fields filled in).
    fn append(&mut self, record: AuditRecord) -> Result<AuditRecord>;
}

/// JSON Lines audit writer.
pub struct AuditWriter {
    path: PathBuf,
    hash_chain: bool,
    last_hash: Option<String>,
}

impl AuditWriter {
    /// Creates the writer and ensures parent dirs exist. Starts a fresh chain.
    pub fn new(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }

        Ok(Self {
            path,
            hash_chain,
            last_hash: None,
        })
    }

    /// Like [`AuditWriter::new`], but resumes the chain from the last record
    /// already in the file.
    pub fn open(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let mut w = Self::new(path, hash_chain)?;
        if w.path.exists() {
            let last = load_recent(&w.path, 1)?;
            w.last_hash = last.into_iter().next().and_then(|r| r.hash_self);
        }
        Ok(w)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_hash(&self) -> Option<String> {
        self.last_hash.clone()
    }
}

impl AuditSink for AuditWriter {
    fn append(&mut self, mut record: AuditRecord) -> Result<AuditRecord> {
        record.hash_prev = None;
        record.hash_self = None;

        if self.hash_chain {
            record.hash_prev = self.last_hash.clone();
            let self_hash = compute_record_hash(&record)?;
            record.hash_self = Some(self_hash);
        }

        let line = canonical_json_line(&record)?;
        append_line(&self.path, &line)?;

        // Only advance the chain once the line is on disk.
        if self.hash_chain {
            self.last_hash = record.hash_self.clone();
        }
        Ok(record)
    }
}

/// Write a single line to file (with trailing newline).
fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open audit log {:?}", path))?;
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    f.write_all(buf.as_bytes())
        .context("write audit line failed")?;
    Ok(())
}

/// Sorted keys, compact JSON, one record per line.
fn canonical_json_line<T: Serialize>(v: &T) -> Result<String> {
    let raw = serde_json::to_value(v).context("serialize audit record failed")?;
    let sorted = sort_keys(&raw);
    serde_json::to_string(&sorted).context("json stringify failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

/// SHA-256 over the canonical JSON of the record with `hash_self` cleared.
pub fn compute_record_hash(record: &AuditRecord) -> Result<String> {
    let mut clone = record.clone();
    clone.hash_self = None;

    let canonical = canonical_json_line(&clone)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Last `limit` records of the log, oldest first. A missing file is empty.
pub fn load_recent(path: impl AsRef<Path>, limit: usize) -> Result<Vec<AuditRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("read audit log {:?}", path))?;

    if limit == 0 {
        return Ok(Vec::new());
    }
    let mut window: VecDeque<AuditRecord> = VecDeque::with_capacity(limit);
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: AuditRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("parse audit record at line {}", i + 1))?;
        if window.len() == limit {
            window.pop_front();
        }
        window.push_back(record);
    }
    Ok(window.into())
}

/// Verify the hash chain of an audit log file.
pub fn verify_hash_chain(path: impl AsRef<Path>) -> Result<VerifyResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read audit log {:?}", path.as_ref()))?;
    verify_hash_chain_str(&content)
}

/// Same as [`verify_hash_chain`], on in-memory JSONL content.
pub fn verify_hash_chain_str(content: &str) -> Result<VerifyResult> {
    let mut prev_hash: Option<String> = None;
    let mut line_count = 0usize;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: AuditRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("parse audit record at line {}", i + 1))?;

        line_count += 1;

        if record.hash_prev != prev_hash {
            return Ok(VerifyResult::Broken {
                line: i + 1,
                reason: format!(
                    "hash_prev mismatch: expected {:?}, got {:?}",
                    prev_hash, record.hash_prev
                ),
            });
        }

        if let Some(ref claimed) = record.hash_self {
            let recomputed = compute_record_hash(&record)?;
            if *claimed != recomputed {
                return Ok(VerifyResult::Broken {
                    line: i + 1,
                    reason: format!(
                        "hash_self mismatch: claimed {}, recomputed {}",
                        claimed, recomputed
                    ),
                });
            }
        }

        prev_hash = record.hash_self.clone();
    }

    Ok(VerifyResult::Valid { lines: line_count })
}

/// Result of hash chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Valid { lines: usize },
    /// First broken line (1-based) and why.
    Broken { line: usize, reason: String },
}
