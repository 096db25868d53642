use msync_diff::DiffSummary;
use msync_errors::{ErrorCode, ErrorDescriptor};
use msync_rules::ValidationIssue;
use msync_schemas::{ApplyResult, Marketplace, PlatformBinding};
use serde::Serialize;

use crate::AdapterError;

pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";
pub const CANCELLED_MESSAGE: &str = "cancelled";

/// Result of one binding's sync pipeline.
///
/// `applied` mirrors `result.success`. `validation_issues` is non-empty only
/// when validation blocked the apply. `error_code` classifies structural
/// failures (auth, transport, validation, partial apply).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub marketplace: Marketplace,
    pub shop_id: String,
    pub applied: bool,
    pub summary: DiffSummary,
    pub result: ApplyResult,
    pub validation_issues: Vec<ValidationIssue>,
    pub error_code: Option<ErrorCode>,
}

impl SyncOutcome {
    pub(crate) fn failed(
        binding: &PlatformBinding,
        summary: DiffSummary,
        err: &AdapterError,
    ) -> Self {
        let msg = err.to_string();
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            applied: false,
            summary,
            result: ApplyResult::failed(msg.clone(), vec![msg]),
            validation_issues: Vec::new(),
            error_code: err.code,
        }
    }

    pub(crate) fn blocked(
        binding: &PlatformBinding,
        summary: DiffSummary,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        let errors = issues.iter().map(ToString::to_string).collect();
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            applied: false,
            summary,
            result: ApplyResult::failed(VALIDATION_FAILED_MESSAGE, errors),
            validation_issues: issues,
            error_code: Some(ErrorCode::ValidationFail),
        }
    }

    pub(crate) fn cancelled(binding: &PlatformBinding, summary: DiffSummary) -> Self {
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            applied: false,
            summary,
            result: ApplyResult::failed(CANCELLED_MESSAGE, Vec::new()),
            validation_issues: Vec::new(),
            error_code: None,
        }
    }

    pub(crate) fn finished(
        binding: &PlatformBinding,
        summary: DiffSummary,
        result: ApplyResult,
    ) -> Self {
        let error_code = result.is_partial().then_some(ErrorCode::PartialApply);
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            applied: result.success,
            summary,
            result,
            validation_issues: Vec::new(),
            error_code,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.result.success && self.result.message == CANCELLED_MESSAGE
    }

    /// Taxonomy entry for `error_code`, for rendering.
    pub fn descriptor(&self) -> Option<&'static ErrorDescriptor> {
        self.error_code.map(ErrorCode::descriptor)
    }
}

/// Result of a pause or hours command on one binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub marketplace: Marketplace,
    pub shop_id: String,
    pub result: ApplyResult,
    pub error_code: Option<ErrorCode>,
}

impl CommandOutcome {
    pub(crate) fn failed(binding: &PlatformBinding, err: &AdapterError) -> Self {
        let msg = err.to_string();
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            result: ApplyResult::failed(msg.clone(), vec![msg]),
            error_code: err.code,
        }
    }

    pub(crate) fn cancelled(binding: &PlatformBinding) -> Self {
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            result: ApplyResult::failed(CANCELLED_MESSAGE, Vec::new()),
            error_code: None,
        }
    }

    pub(crate) fn finished(binding: &PlatformBinding, result: ApplyResult) -> Self {
        let error_code = result.is_partial().then_some(ErrorCode::PartialApply);
        Self {
            marketplace: binding.marketplace,
            shop_id: binding.shop_id.clone(),
            result,
            error_code,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.result.success && self.result.message == CANCELLED_MESSAGE
    }

    pub fn descriptor(&self) -> Option<&'static ErrorDescriptor> {
        self.error_code.map(ErrorCode::descriptor)
    }
}
