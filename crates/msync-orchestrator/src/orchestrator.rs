use anyhow::{bail, Context, Result};
use chrono::Utc;
use msync_audit::{AuditAction, AuditRecord, AuditSink};
use msync_config::{Credential, CredentialStore};
use msync_diff::{compute_delta, DiffSummary};
use msync_rules::RuleBook;
use msync_schemas::{
    ApplyResult, AuthSession, CatalogItem, CatalogSnapshot, HoursCommand, PauseCommand,
    PlatformBinding, Store,
};
use msync_store::CatalogRepository;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span, warn};

use crate::{
    AdapterError, AdapterRegistry, CancelToken, CommandOutcome, MarketplaceAdapter, SyncOutcome,
};

/// Sync pipeline driver for one process.
///
/// Collaborators are injected: catalog repository `C`, credential store `S`,
/// audit sink `A`, the rule book and one adapter per marketplace.
pub struct SyncOrchestrator<C, S, A> {
    catalog: C,
    credentials: S,
    audit: A,
    rules: RuleBook,
    adapters: AdapterRegistry,
    cancel: CancelToken,
}

impl<C, S, A> SyncOrchestrator<C, S, A>
where
    C: CatalogRepository,
    S: CredentialStore,
    A: AuditSink,
{
    pub fn new(
        catalog: C,
        credentials: S,
        audit: A,
        rules: RuleBook,
        adapters: AdapterRegistry,
    ) -> Self {
        Self {
            catalog,
            credentials,
            audit,
            rules,
            adapters,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn credentials(&self) -> &S {
        &self.credentials
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    // -----------------------------------------------------------------------
    // Preflight
    // -----------------------------------------------------------------------

    /// Configuration checks for every binding before anything is touched.
    ///
    /// Returns the resolved credentials, index-aligned with `store.bindings`.
    fn preflight(&self, store: &Store, needs_rules: bool) -> Result<Vec<Credential>> {
        let mut resolved = Vec::with_capacity(store.bindings.len());
        for binding in &store.bindings {
            if !self.adapters.contains(binding.marketplace) {
                bail!(
                    "ADAPTER_NOT_REGISTERED: no adapter for {} (store {}, binding {})",
                    binding.marketplace,
                    store.id,
                    binding.entity_key()
                );
            }
            if needs_rules {
                self.rules.rules_for(binding.marketplace)?;
            }
            let credential = self
                .credentials
                .load(&binding.credential_ref)
                .with_context(|| format!("resolve credentials for {}", binding.entity_key()))?;
            resolved.push(credential);
        }
        Ok(resolved)
    }

    // -----------------------------------------------------------------------
    // Catalog sync
    // -----------------------------------------------------------------------

    /// Push `canonical` to every marketplace bound to `store`.
    ///
    /// The canonical catalog is persisted once, before any binding runs.
    /// Returns one outcome per binding, in binding order.
    pub fn sync_store(
        &mut self,
        store: &Store,
        canonical: &[CatalogItem],
        actor: &str,
    ) -> Result<Vec<SyncOutcome>> {
        let credentials = self.preflight(store, true)?;

        info!(
            store_id = %store.id,
            bindings = store.bindings.len(),
            items = canonical.len(),
            "sync start"
        );

        if self.cancel.is_cancelled() {
            warn!(store_id = %store.id, "sync cancelled before catalog persistence");
            return Ok(store
                .bindings
                .iter()
                .map(|b| SyncOutcome::cancelled(b, DiffSummary::default()))
                .collect());
        }

        let snapshot = CatalogSnapshot {
            store_id: store.id.clone(),
            items: canonical.to_vec(),
            saved_at_utc: Utc::now(),
        };
        self.catalog
            .save_snapshot(&snapshot)
            .with_context(|| format!("persist canonical catalog for store {}", store.id))?;

        let mut outcomes = Vec::with_capacity(store.bindings.len());
        for (binding, credential) in store.bindings.iter().zip(&credentials) {
            let _span = info_span!(
                "binding",
                marketplace = %binding.marketplace,
                shop_id = %binding.shop_id
            )
            .entered();
            outcomes.push(self.sync_binding(binding, credential, canonical, actor)?);
        }

        let applied = outcomes.iter().filter(|o| o.applied).count();
        info!(store_id = %store.id, applied, total = outcomes.len(), "sync done");
        Ok(outcomes)
    }

    fn sync_binding(
        &mut self,
        binding: &PlatformBinding,
        credential: &Credential,
        canonical: &[CatalogItem],
        actor: &str,
    ) -> Result<SyncOutcome> {
        if self.cancel.is_cancelled() {
            info!("cancelled before login");
            return Ok(SyncOutcome::cancelled(binding, DiffSummary::default()));
        }
        let adapter = self.adapters.get_mut(binding.marketplace)?;

        // LOGIN
        let session = match adapter.login(binding, credential.username(), credential.password()) {
            Ok(session) => session,
            Err(err) => {
                warn!(code = ?err.code, error = %err, "login failed");
                return Ok(SyncOutcome::failed(binding, DiffSummary::default(), &err));
            }
        };

        if self.cancel.is_cancelled() {
            info!("cancelled before fetch");
            return Ok(SyncOutcome::cancelled(binding, DiffSummary::default()));
        }

        // FETCH_REMOTE
        let remote = match adapter.fetch_snapshot(&session) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(code = ?err.code, error = %err, "fetch failed");
                return Ok(SyncOutcome::failed(binding, DiffSummary::default(), &err));
            }
        };

        // DIFF
        let (delta, summary) = compute_delta(canonical, &remote.items);
        debug!(
            remote_items = remote.items.len(),
            updated = summary.updated.len(),
            price_changed = summary.price_changed.len(),
            availability_changed = summary.availability_changed.len(),
            "diff computed"
        );

        // VALIDATE
        let issues = self.rules.validate(binding.marketplace, canonical)?;
        if !issues.is_empty() {
            warn!(issues = issues.len(), "validation blocked apply");
            return Ok(SyncOutcome::blocked(binding, summary, issues));
        }

        if self.cancel.is_cancelled() {
            info!("cancelled before apply");
            return Ok(SyncOutcome::cancelled(binding, summary));
        }

        // APPLY
        let result = match adapter.apply_changes(&session, &delta) {
            Ok(result) => result,
            Err(err) => {
                warn!(code = ?err.code, error = %err, "apply failed");
                return Ok(SyncOutcome::failed(binding, summary, &err));
            }
        };
        log_result(&result);

        // AUDIT
        let mut after = Map::new();
        after.insert(
            "summary".to_string(),
            serde_json::to_value(&summary).context("serialize diff summary")?,
        );
        self.audit
            .append(AuditRecord::new(
                actor,
                AuditAction::Apply,
                binding.entity_key(),
                Value::Object(after),
            ))
            .with_context(|| format!("AUDIT_WRITE_FAILED: apply on {}", binding.entity_key()))?;

        Ok(SyncOutcome::finished(binding, summary, result))
    }

    // -----------------------------------------------------------------------
    // Store commands
    // -----------------------------------------------------------------------

    /// Pause or resume the store on every bound marketplace.
    pub fn toggle_pause(
        &mut self,
        store: &Store,
        command: &PauseCommand,
        actor: &str,
    ) -> Result<Vec<CommandOutcome>> {
        let mut after = Map::new();
        after.insert("paused".to_string(), Value::Bool(command.paused));
        after.insert(
            "reason".to_string(),
            serde_json::to_value(&command.reason).context("serialize pause reason")?,
        );
        after.insert(
            "until".to_string(),
            serde_json::to_value(command.until).context("serialize pause until")?,
        );

        let after = Value::Object(after);
        self.run_command(store, actor, AuditAction::Pause, after, |adapter, session| {
            adapter.set_pause(session, command)
        })
    }

    /// Replace operating hours on every bound marketplace.
    pub fn update_hours(
        &mut self,
        store: &Store,
        command: &HoursCommand,
        actor: &str,
    ) -> Result<Vec<CommandOutcome>> {
        let mut after = Map::new();
        after.insert(
            "hours".to_string(),
            serde_json::to_value(&command.hours).context("serialize operating hours")?,
        );

        let after = Value::Object(after);
        self.run_command(store, actor, AuditAction::Hours, after, |adapter, session| {
            adapter.set_operating_hours(session, command)
        })
    }

    /// Reduced pipeline shared by store commands: `LOGIN -> APPLY -> AUDIT`.
    fn run_command<F>(
        &mut self,
        store: &Store,
        actor: &str,
        action: AuditAction,
        after: Value,
        mut call: F,
    ) -> Result<Vec<CommandOutcome>>
    where
        F: FnMut(
            &mut (dyn MarketplaceAdapter + 'static),
            &AuthSession,
        ) -> Result<ApplyResult, AdapterError>,
    {
        let credentials = self.preflight(store, false)?;
        info!(
            store_id = %store.id,
            action = %action,
            bindings = store.bindings.len(),
            "command start"
        );

        let mut outcomes = Vec::with_capacity(store.bindings.len());
        for (binding, credential) in store.bindings.iter().zip(&credentials) {
            let _span = info_span!(
                "binding",
                marketplace = %binding.marketplace,
                shop_id = %binding.shop_id
            )
            .entered();

            if self.cancel.is_cancelled() {
                info!("cancelled before login");
                outcomes.push(CommandOutcome::cancelled(binding));
                continue;
            }
            let adapter = self.adapters.get_mut(binding.marketplace)?;

            let session =
                match adapter.login(binding, credential.username(), credential.password()) {
                    Ok(session) => session,
                    Err(err) => {
                        warn!(code = ?err.code, error = %err, "login failed");
                        outcomes.push(CommandOutcome::failed(binding, &err));
                        continue;
                    }
                };

            if self.cancel.is_cancelled() {
                info!("cancelled before apply");
                outcomes.push(CommandOutcome::cancelled(binding));
                continue;
            }

            let result = match call(adapter, &session) {
                Ok(result) => result,
                Err(err) => {
                    warn!(code = ?err.code, error = %err, "command failed");
                    outcomes.push(CommandOutcome::failed(binding, &err));
                    continue;
                }
            };
            log_result(&result);

            self.audit
                .append(AuditRecord::new(
                    actor,
                    action,
                    binding.entity_key(),
                    after.clone(),
                ))
                .with_context(|| {
                    format!("AUDIT_WRITE_FAILED: {action} on {}", binding.entity_key())
                })?;

            outcomes.push(CommandOutcome::finished(binding, result));
        }
        Ok(outcomes)
    }
}

fn log_result(result: &ApplyResult) {
    if result.success {
        info!(message = %result.message, "applied");
    } else if result.partial {
        warn!(errors = result.errors.len(), message = %result.message, "partially applied");
    } else {
        warn!(errors = result.errors.len(), message = %result.message, "apply rejected");
    }
}
