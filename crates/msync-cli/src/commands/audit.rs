//! `msync audit verify|tail`.

use anyhow::{bail, Result};
use msync_audit::{load_recent, verify_hash_chain, VerifyResult};
use std::path::PathBuf;

use super::{load_config, ConfigArgs};

pub fn run_verify(path: &str) -> Result<()> {
    match verify_hash_chain(path)? {
        VerifyResult::Valid { lines } => {
            println!("audit_chain=valid lines={lines} path={path}");
            Ok(())
        }
        VerifyResult::Broken { line, reason } => {
            println!("audit_chain=broken line={line} path={path}");
            bail!("AUDIT_CHAIN_BROKEN: line {line}: {reason}");
        }
    }
}

/// `path` overrides `paths.audit_log`; config is only loaded when it is absent.
pub fn run_tail(args: &ConfigArgs, path: Option<String>, limit: usize) -> Result<()> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => load_config(args)?.paths.audit_log,
    };

    for r in load_recent(&path, limit)? {
        println!(
            "ts_utc={} actor={} action={} entity={} after={}",
            r.ts_utc.to_rfc3339(),
            r.actor,
            r.action,
            r.entity,
            r.after
        );
    }
    Ok(())
}
