use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use msync_errors::ErrorCode;
use msync_orchestrator::{AdapterError, CancelToken, MarketplaceAdapter};
use msync_schemas::{
    ApplyResult, AuthSession, CatalogItem, HoursCommand, Marketplace, PauseCommand,
    PlatformBinding, PlatformSnapshot, UnifiedDelta,
};

use crate::CallLog;

/// Adapter whose every answer is set up front.
///
/// Each call is recorded in the shared [`CallLog`] as
/// `<MARKETPLACE>:<call>:<shop_id>`, and every delta handed to
/// `apply_changes` is kept for inspection through [`ScriptedMarketplace::applied`].
#[derive(Debug)]
pub struct ScriptedMarketplace {
    marketplace: Marketplace,
    log: CallLog,
    remote: BTreeMap<String, Vec<CatalogItem>>,
    login_failures: BTreeMap<String, ErrorCode>,
    fetch_failure: Option<AdapterError>,
    apply_failure: Option<AdapterError>,
    missing_on_apply: BTreeSet<String>,
    cancel_after_login: Option<CancelToken>,
    applied: Arc<Mutex<Vec<UnifiedDelta>>>,
}

impl ScriptedMarketplace {
    pub fn new(marketplace: Marketplace, log: CallLog) -> Self {
        Self {
            marketplace,
            log,
            remote: BTreeMap::new(),
            login_failures: BTreeMap::new(),
            fetch_failure: None,
            apply_failure: None,
            missing_on_apply: BTreeSet::new(),
            cancel_after_login: None,
            applied: Default::default(),
        }
    }

    /// Remote catalog returned by `fetch_snapshot` for `shop_id`.
    pub fn with_remote(mut self, shop_id: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        self.remote.insert(shop_id.into(), items);
        self
    }

    /// `login` for `shop_id` fails with `code`.
    pub fn rejecting_login(mut self, shop_id: impl Into<String>, code: ErrorCode) -> Self {
        self.login_failures.insert(shop_id.into(), code);
        self
    }

    pub fn failing_fetch(mut self, err: AdapterError) -> Self {
        self.fetch_failure = Some(err);
        self
    }

    pub fn failing_apply(mut self, err: AdapterError) -> Self {
        self.apply_failure = Some(err);
        self
    }

    /// The portal reports `item_id` as unknown whenever a delta references it.
    pub fn missing_on_apply(mut self, item_id: impl Into<String>) -> Self {
        self.missing_on_apply.insert(item_id.into());
        self
    }

    /// Trip `token` right after a successful login.
    pub fn cancelling_after_login(mut self, token: CancelToken) -> Self {
        self.cancel_after_login = Some(token);
        self
    }

    /// Handle to the deltas received so far; stays valid after the adapter
    /// is boxed into a registry.
    pub fn applied(&self) -> Arc<Mutex<Vec<UnifiedDelta>>> {
        self.applied.clone()
    }

    fn record(&self, call: &str, shop_id: &str) {
        self.log.push(format!("{}:{call}:{shop_id}", self.marketplace));
    }
}

impl MarketplaceAdapter for ScriptedMarketplace {
    fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    fn login(
        &mut self,
        binding: &PlatformBinding,
        username: &str,
        _password: &str,
    ) -> Result<AuthSession, AdapterError> {
        self.record("login", &binding.shop_id);
        if let Some(code) = self.login_failures.get(&binding.shop_id) {
            return Err(AdapterError::classified(*code, "portal refused login"));
        }
        if let Some(token) = &self.cancel_after_login {
            token.cancel();
        }
        Ok(AuthSession {
            marketplace: self.marketplace,
            shop_id: binding.shop_id.clone(),
            token: format!("scripted-{username}"),
            selector_version: "scripted".to_string(),
        })
    }

    fn fetch_snapshot(&mut self, session: &AuthSession) -> Result<PlatformSnapshot, AdapterError> {
        self.record("fetch", &session.shop_id);
        if let Some(err) = &self.fetch_failure {
            return Err(err.clone());
        }
        let mut snapshot = PlatformSnapshot::empty(self.marketplace, session.shop_id.clone());
        if let Some(items) = self.remote.get(&session.shop_id) {
            snapshot.items = items.clone();
        }
        Ok(snapshot)
    }

    fn apply_changes(
        &mut self,
        session: &AuthSession,
        delta: &UnifiedDelta,
    ) -> Result<ApplyResult, AdapterError> {
        self.record("apply", &session.shop_id);
        if let Some(err) = &self.apply_failure {
            return Err(err.clone());
        }
        self.applied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(delta.clone());

        let errors = self
            .missing_on_apply
            .iter()
            .filter(|id| delta.references(id))
            .map(|id| format!("Item {id} not found"))
            .collect();
        Ok(ApplyResult::from_errors("scripted apply", errors))
    }

    fn set_pause(
        &mut self,
        session: &AuthSession,
        _command: &PauseCommand,
    ) -> Result<ApplyResult, AdapterError> {
        self.record("pause", &session.shop_id);
        if let Some(err) = &self.apply_failure {
            return Err(err.clone());
        }
        Ok(ApplyResult::ok("scripted pause"))
    }

    fn set_operating_hours(
        &mut self,
        session: &AuthSession,
        _command: &HoursCommand,
    ) -> Result<ApplyResult, AdapterError> {
        self.record("hours", &session.shop_id);
        if let Some(err) = &self.apply_failure {
            return Err(err.clone());
        }
        Ok(ApplyResult::ok("scripted hours"))
    }
}
