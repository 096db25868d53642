//! Marketplace adapter contract.
//!
//! One adapter instance per marketplace. The orchestrator treats it as an
//! opaque capability: it never inspects portal details, only the returned
//! sessions, snapshots and [`ApplyResult`]s.

use msync_errors::ErrorCode;
use msync_schemas::{
    ApplyResult, AuthSession, HoursCommand, Marketplace, PauseCommand, PlatformBinding,
    PlatformSnapshot, UnifiedDelta,
};

/// Capability surface every marketplace integration provides.
///
/// All calls block until the portal answers. No implicit timeout or retry.
///
/// # Contract
/// - `login` fails with an [`AdapterError`] when credentials are rejected
///   (`AUTH_INVALID`, `AUTH_2FA_REQUIRED`, `CAPTCHA_BLOCKED`, ...).
/// - Mutating calls report per-item problems inside the [`ApplyResult`]
///   (partial apply). `Err` means nothing was acknowledged.
pub trait MarketplaceAdapter {
    fn marketplace(&self) -> Marketplace;

    fn login(
        &mut self,
        binding: &PlatformBinding,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, AdapterError>;

    fn fetch_snapshot(&mut self, session: &AuthSession) -> Result<PlatformSnapshot, AdapterError>;

    fn apply_changes(
        &mut self,
        session: &AuthSession,
        delta: &UnifiedDelta,
    ) -> Result<ApplyResult, AdapterError>;

    fn set_pause(
        &mut self,
        session: &AuthSession,
        command: &PauseCommand,
    ) -> Result<ApplyResult, AdapterError>;

    fn set_operating_hours(
        &mut self,
        session: &AuthSession,
        command: &HoursCommand,
    ) -> Result<ApplyResult, AdapterError>;
}

/// Failure reported by an adapter call.
///
/// `code` is set when the adapter could classify the failure against the
/// error taxonomy; unclassified failures still carry a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterError {
    pub code: Option<ErrorCode>,
    pub message: String,
}

impl AdapterError {
    pub fn classified(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::classified(ErrorCode::AuthInvalid, message)
    }
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AdapterError {}
