//! Marketplace credential resolution.
//!
//! # Contract
//! - Config stores only **env var NAMES** per credential ref.
//! - Values are read from the environment at lookup time and never logged.
//! - `Debug` on [`Credential`] **redacts** the password.
//! - Error messages reference the ref and the env var **NAME**, never a value.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::{CredentialEnv, SyncConfig};

/// Username/password pair for one marketplace login.
/// **The password is redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Lookup of credentials by the opaque reference a binding carries.
pub trait CredentialStore {
    /// `Err` when the reference is unknown or cannot be resolved.
    fn load(&self, credential_ref: &str) -> Result<Credential>;
}

/// Resolves credential refs to env var values.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialStore {
    refs: BTreeMap<String, CredentialEnv>,
}

impl EnvCredentialStore {
    pub fn new(refs: BTreeMap<String, CredentialEnv>) -> Self {
        Self { refs }
    }

    pub fn from_config(cfg: &SyncConfig) -> Self {
        Self::new(cfg.credentials.clone())
    }

    pub fn knows(&self, credential_ref: &str) -> bool {
        self.refs.contains_key(credential_ref)
    }
}

/// Unset or blank counts as missing.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

impl CredentialStore for EnvCredentialStore {
    fn load(&self, credential_ref: &str) -> Result<Credential> {
        let Some(names) = self.refs.get(credential_ref) else {
            bail!("CREDENTIAL_NOT_FOUND: unknown credential ref '{credential_ref}'");
        };

        let Some(username) = resolve_env(&names.username_env) else {
            bail!(
                "SECRETS_MISSING ref={credential_ref}: required env var '{}' \
                 (username) is not set or empty",
                names.username_env,
            );
        };
        let Some(password) = resolve_env(&names.password_env) else {
            bail!(
                "SECRETS_MISSING ref={credential_ref}: required env var '{}' \
                 (password) is not set or empty",
                names.password_env,
            );
        };

        Ok(Credential { username, password })
    }
}
