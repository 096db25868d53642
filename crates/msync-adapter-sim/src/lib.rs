//! File-backed simulated marketplace.
//!
//! Emulates a marketplace portal by keeping each shop's state in a JSON file:
//! `<state_dir>/<shop_id>_<marketplace>.json` (both lower-cased), created empty
//! on first access.
//!
//! Behaviour:
//! - `login` rejects with `AUTH_INVALID` when a username was registered for the
//!   shop and a different one is presented. Passwords are not checked.
//! - Session tokens are `session-<shop_id>-<username>`.
//! - `apply_changes` upserts full replacements by id (existing items keep
//!   their position, new ones are appended), then applies toggles, prices and
//!   sold-out flags. Targeted updates on unknown ids are reported one error
//!   each and the result is partial; everything else is still applied.
//! - Pause and hours overwrite the stored state.
//!
//! No network, no randomness. Useful for local runs and end-to-end tests.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use msync_orchestrator::{AdapterError, MarketplaceAdapter};
use msync_schemas::{
    ApplyResult, AuthSession, CatalogItem, HoursCommand, Marketplace, PauseCommand,
    PlatformBinding, PlatformSnapshot, UnifiedDelta,
};
use tracing::debug;

pub const APPLIED_MESSAGE: &str = "Applied changes";
pub const PAUSE_MESSAGE: &str = "Updated pause state";
pub const HOURS_MESSAGE: &str = "Updated operating hours";

#[derive(Clone, Debug)]
pub struct SimulatedMarketplace {
    marketplace: Marketplace,
    selector_version: String,
    state_dir: PathBuf,
    expected_usernames: BTreeMap<String, String>,
}

impl SimulatedMarketplace {
    /// Creates `state_dir` if needed.
    pub fn new(
        marketplace: Marketplace,
        selector_version: impl Into<String>,
        state_dir: impl AsRef<Path>,
    ) -> Result<Self, AdapterError> {
        let state_dir = state_dir.as_ref().to_path_buf();
        fs::create_dir_all(&state_dir).map_err(|e| {
            AdapterError::unclassified(format!("create state dir {:?}: {e}", state_dir))
        })?;
        Ok(Self {
            marketplace,
            selector_version: selector_version.into(),
            state_dir,
            expected_usernames: BTreeMap::new(),
        })
    }

    /// Username the portal accepts for `shop_id`. Unregistered shops accept any.
    pub fn register_credentials(&mut self, shop_id: impl Into<String>, username: impl Into<String>) {
        self.expected_usernames.insert(shop_id.into(), username.into());
    }

    pub fn state_path(&self, shop_id: &str) -> PathBuf {
        self.state_dir.join(format!(
            "{}_{}.json",
            shop_id.to_lowercase(),
            self.marketplace.as_str().to_lowercase()
        ))
    }

    fn check_shop_id(shop_id: &str) -> Result<(), AdapterError> {
        if shop_id.is_empty() || shop_id.contains(['/', '\\']) || shop_id.starts_with('.') {
            return Err(AdapterError::unclassified(format!(
                "shop id '{shop_id}' cannot name a state file"
            )));
        }
        Ok(())
    }

    fn load_state(&self, shop_id: &str) -> Result<PlatformSnapshot, AdapterError> {
        Self::check_shop_id(shop_id)?;
        let path = self.state_path(shop_id);
        if !path.exists() {
            let snapshot = PlatformSnapshot::empty(self.marketplace, shop_id);
            self.save_state(shop_id, &snapshot)?;
            return Ok(snapshot);
        }
        let raw = fs::read(&path)
            .map_err(|e| AdapterError::unclassified(format!("read {:?}: {e}", path)))?;
        serde_json::from_slice(&raw)
            .map_err(|e| AdapterError::unclassified(format!("parse {:?}: {e}", path)))
    }

    fn save_state(&self, shop_id: &str, snapshot: &PlatformSnapshot) -> Result<(), AdapterError> {
        let path = self.state_path(shop_id);
        let body = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| AdapterError::unclassified(format!("serialize state: {e}")))?;
        fs::write(&path, body)
            .map_err(|e| AdapterError::unclassified(format!("write {:?}: {e}", path)))
    }

    fn check_session(&self, session: &AuthSession) -> Result<(), AdapterError> {
        if session.marketplace != self.marketplace {
            return Err(AdapterError::unclassified(format!(
                "session for {} presented to {}",
                session.marketplace, self.marketplace
            )));
        }
        Ok(())
    }
}

/// Upsert-then-patch over the stored items. Returns one error per targeted
/// update that names an unknown id.
fn apply_delta(items: &mut Vec<CatalogItem>, delta: &UnifiedDelta) -> Vec<String> {
    let mut index: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();

    for item in &delta.updated_items {
        match index.get(&item.id) {
            Some(&i) => items[i] = item.clone(),
            None => {
                index.insert(item.id.clone(), items.len());
                items.push(item.clone());
            }
        }
    }

    let mut errors = Vec::new();
    for (id, available) in &delta.toggled_items {
        match index.get(id) {
            Some(&i) => items[i].available = *available,
            None => errors.push(format!("Item {id} not found for availability toggle")),
        }
    }
    for (id, price) in &delta.price_updates {
        match index.get(id) {
            Some(&i) => items[i].price = *price,
            None => errors.push(format!("Item {id} not found for price update")),
        }
    }
    for (id, sold_out) in &delta.sold_out_items {
        match index.get(id) {
            Some(&i) => items[i].available = !*sold_out,
            None => errors.push(format!("Item {id} not found for sold-out toggle")),
        }
    }
    errors
}

impl MarketplaceAdapter for SimulatedMarketplace {
    fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    fn login(
        &mut self,
        binding: &PlatformBinding,
        username: &str,
        _password: &str,
    ) -> Result<AuthSession, AdapterError> {
        if let Some(expected) = self.expected_usernames.get(&binding.shop_id) {
            if expected != username {
                return Err(AdapterError::auth_invalid("username mismatch"));
            }
        }
        Ok(AuthSession {
            marketplace: self.marketplace,
            shop_id: binding.shop_id.clone(),
            token: format!("session-{}-{}", binding.shop_id, username),
            selector_version: self.selector_version.clone(),
        })
    }

    fn fetch_snapshot(&mut self, session: &AuthSession) -> Result<PlatformSnapshot, AdapterError> {
        self.check_session(session)?;
        self.load_state(&session.shop_id)
    }

    fn apply_changes(
        &mut self,
        session: &AuthSession,
        delta: &UnifiedDelta,
    ) -> Result<ApplyResult, AdapterError> {
        self.check_session(session)?;
        let mut snapshot = self.load_state(&session.shop_id)?;
        let errors = apply_delta(&mut snapshot.items, delta);
        self.save_state(&session.shop_id, &snapshot)?;
        debug!(
            marketplace = %self.marketplace,
            shop_id = %session.shop_id,
            items = snapshot.items.len(),
            errors = errors.len(),
            "simulated apply"
        );
        Ok(ApplyResult::from_errors(APPLIED_MESSAGE, errors))
    }

    fn set_pause(
        &mut self,
        session: &AuthSession,
        command: &PauseCommand,
    ) -> Result<ApplyResult, AdapterError> {
        self.check_session(session)?;
        let mut snapshot = self.load_state(&session.shop_id)?;
        snapshot.state.paused = command.paused;
        snapshot.state.reason = command.reason.clone();
        snapshot.state.until = command.until;
        self.save_state(&session.shop_id, &snapshot)?;
        Ok(ApplyResult::ok(PAUSE_MESSAGE))
    }

    fn set_operating_hours(
        &mut self,
        session: &AuthSession,
        command: &HoursCommand,
    ) -> Result<ApplyResult, AdapterError> {
        self.check_session(session)?;
        let mut snapshot = self.load_state(&session.shop_id)?;
        snapshot.hours = command.hours.clone();
        self.save_state(&session.shop_id, &snapshot)?;
        Ok(ApplyResult::ok(HOURS_MESSAGE))
    }
}
