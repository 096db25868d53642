//! msync-orchestrator
//!
//! Drives the per-marketplace sync pipeline for one store:
//!
//! `LOGIN -> FETCH_REMOTE -> DIFF -> VALIDATE -> APPLY -> AUDIT`
//!
//! - Bindings run sequentially and independently; one marketplace failing
//!   never skips another.
//! - Validation is a hard gate: any issue blocks the apply.
//! - Every adapter-acknowledged mutation gets exactly one audit record.
//! - Only configuration defects (unregistered adapter, missing rules, unknown
//!   credential ref) and infrastructure failures (catalog or audit writes)
//!   surface as `Err`. Everything else becomes an outcome.

mod adapter;
mod cancel;
mod orchestrator;
mod outcome;
mod registry;

pub use adapter::{AdapterError, MarketplaceAdapter};
pub use cancel::CancelToken;
pub use orchestrator::SyncOrchestrator;
pub use outcome::{CommandOutcome, SyncOutcome, CANCELLED_MESSAGE, VALIDATION_FAILED_MESSAGE};
pub use registry::AdapterRegistry;
