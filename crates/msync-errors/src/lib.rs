//! msync-errors
//!
//! Error taxonomy for marketplace operations.
//!
//! A fixed, process-wide table mapping each [`ErrorCode`] to its severity,
//! cause, recovery class and operator hint. The table is a `static` slice:
//! built at compile time, never mutated, every lookup is a pure read.
//!
//! Renderers consult it to explain outcomes. The orchestrator only attaches
//! codes to outcomes; it never reads recovery classes to drive retries.

mod table;

pub use table::TAXONOMY;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified failure codes reported by marketplace adapters and the
/// orchestrator.
///
/// Discriminants index [`TAXONOMY`]; keep both in the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthInvalid = 0,
    #[serde(rename = "AUTH_2FA_REQUIRED")]
    Auth2faRequired = 1,
    CaptchaBlocked = 2,
    SelectorMissing = 3,
    ElementNotInteractable = 4,
    ToastError = 5,
    RateLimit = 6,
    Timeout = 7,
    UploadFail = 8,
    ValidationFail = 9,
    PartialApply = 10,
    SnapshotMismatch = 11,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::AuthInvalid,
        ErrorCode::Auth2faRequired,
        ErrorCode::CaptchaBlocked,
        ErrorCode::SelectorMissing,
        ErrorCode::ElementNotInteractable,
        ErrorCode::ToastError,
        ErrorCode::RateLimit,
        ErrorCode::Timeout,
        ErrorCode::UploadFail,
        ErrorCode::ValidationFail,
        ErrorCode::PartialApply,
        ErrorCode::SnapshotMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalid => "AUTH_INVALID",
            ErrorCode::Auth2faRequired => "AUTH_2FA_REQUIRED",
            ErrorCode::CaptchaBlocked => "CAPTCHA_BLOCKED",
            ErrorCode::SelectorMissing => "SELECTOR_MISSING",
            ErrorCode::ElementNotInteractable => "ELEMENT_NOT_INTERACTABLE",
            ErrorCode::ToastError => "TOAST_ERROR",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::UploadFail => "UPLOAD_FAIL",
            ErrorCode::ValidationFail => "VALIDATION_FAIL",
            ErrorCode::PartialApply => "PARTIAL_APPLY",
            ErrorCode::SnapshotMismatch => "SNAPSHOT_MISMATCH",
        }
    }

    /// Taxonomy entry for this code. Total: every variant has a row.
    pub fn descriptor(self) -> &'static ErrorDescriptor {
        &TAXONOMY[self as usize]
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ErrorCode::ALL
            .into_iter()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| UnknownErrorCode {
                code: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        };
        f.write_str(s)
    }
}

/// What an operator (or a future scheduler) should do about a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryClass {
    RequestCredentialRefresh,
    PromptForSecondFactor,
    EscalateToHuman,
    SwitchSelectorVersion,
    RetryAfterWait,
    ExponentialBackoff,
    ResizeAndRetry,
    UserCorrectionRequired,
    RequeueFailedSubset,
    RequeryAfterDelay,
}

impl RecoveryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryClass::RequestCredentialRefresh => "request-credential-refresh",
            RecoveryClass::PromptForSecondFactor => "prompt-for-second-factor",
            RecoveryClass::EscalateToHuman => "escalate-to-human",
            RecoveryClass::SwitchSelectorVersion => "switch-selector-version",
            RecoveryClass::RetryAfterWait => "retry-after-wait",
            RecoveryClass::ExponentialBackoff => "exponential-backoff",
            RecoveryClass::ResizeAndRetry => "resize-and-retry",
            RecoveryClass::UserCorrectionRequired => "user-correction-required",
            RecoveryClass::RequeueFailedSubset => "requeue-failed-subset",
            RecoveryClass::RequeryAfterDelay => "requery-after-delay",
        }
    }
}

impl fmt::Display for RecoveryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub code: ErrorCode,
    pub severity: Severity,
    pub cause: &'static str,
    pub recovery: RecoveryClass,
    pub user_hint: &'static str,
}

/// Lookup of a code string that is not in the taxonomy.
///
/// Callers hold codes produced by this crate, so this means a typo or a stale
/// code in persisted data. It is surfaced, never defaulted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownErrorCode {
    pub code: String,
}

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR_CODE_UNKNOWN: '{}' is not in the error taxonomy", self.code)
    }
}

impl std::error::Error for UnknownErrorCode {}

/// Look up a taxonomy entry by its wire code (e.g. `"RATE_LIMIT"`).
pub fn lookup(code: &str) -> Result<&'static ErrorDescriptor, UnknownErrorCode> {
    code.parse::<ErrorCode>().map(ErrorCode::descriptor)
}
