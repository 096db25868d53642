use crate::{ErrorCode, ErrorDescriptor, RecoveryClass, Severity};

/// The taxonomy, indexed by `ErrorCode as usize`.
pub static TAXONOMY: &[ErrorDescriptor] = &[
    ErrorDescriptor {
        code: ErrorCode::AuthInvalid,
        severity: Severity::High,
        cause: "Credential rejected by marketplace",
        recovery: RecoveryClass::RequestCredentialRefresh,
        user_hint: "Update the marketplace credentials in settings.",
    },
    ErrorDescriptor {
        code: ErrorCode::Auth2faRequired,
        severity: Severity::Medium,
        cause: "One-time password required",
        recovery: RecoveryClass::PromptForSecondFactor,
        user_hint: "Enter the second-factor code to continue.",
    },
    ErrorDescriptor {
        code: ErrorCode::CaptchaBlocked,
        severity: Severity::High,
        cause: "Captcha challenge detected",
        recovery: RecoveryClass::EscalateToHuman,
        user_hint: "Solve the captcha in the marketplace portal, then try again.",
    },
    ErrorDescriptor {
        code: ErrorCode::SelectorMissing,
        severity: Severity::High,
        cause: "Portal page structure no longer matches the selector map",
        recovery: RecoveryClass::SwitchSelectorVersion,
        user_hint: "Wait for an updated connector version to be deployed.",
    },
    ErrorDescriptor {
        code: ErrorCode::ElementNotInteractable,
        severity: Severity::Medium,
        cause: "Portal element not interactable",
        recovery: RecoveryClass::RetryAfterWait,
        user_hint: "Scroll the page or wait a moment, then try again.",
    },
    ErrorDescriptor {
        code: ErrorCode::ToastError,
        severity: Severity::Medium,
        cause: "Marketplace returned a form validation error",
        recovery: RecoveryClass::UserCorrectionRequired,
        user_hint: "Check the highlighted fields and correct them.",
    },
    ErrorDescriptor {
        code: ErrorCode::RateLimit,
        severity: Severity::Medium,
        cause: "Too many requests",
        recovery: RecoveryClass::ExponentialBackoff,
        user_hint: "Retry after a short wait.",
    },
    ErrorDescriptor {
        code: ErrorCode::Timeout,
        severity: Severity::Medium,
        cause: "Operation timed out",
        recovery: RecoveryClass::RetryAfterWait,
        user_hint: "Check the network connection.",
    },
    ErrorDescriptor {
        code: ErrorCode::UploadFail,
        severity: Severity::Low,
        cause: "Image upload failed",
        recovery: RecoveryClass::ResizeAndRetry,
        user_hint: "Check the image size and format.",
    },
    ErrorDescriptor {
        code: ErrorCode::ValidationFail,
        severity: Severity::Low,
        cause: "Pre-apply validation failed",
        recovery: RecoveryClass::UserCorrectionRequired,
        user_hint: "Fix the reported values in the catalog.",
    },
    ErrorDescriptor {
        code: ErrorCode::PartialApply,
        severity: Severity::Info,
        cause: "Some changes were not applied",
        recovery: RecoveryClass::RequeueFailedSubset,
        user_hint: "Only the failed items need to be retried.",
    },
    ErrorDescriptor {
        code: ErrorCode::SnapshotMismatch,
        severity: Severity::Low,
        cause: "Post-apply snapshot does not match yet",
        recovery: RecoveryClass::RequeryAfterDelay,
        user_hint: "Changes can take a while to show up on the marketplace.",
    },
];
