//! msync-schemas
//!
//! Shared data model for the canonical catalog, marketplace bindings, remote
//! snapshots and the change payloads exchanged with marketplace adapters.
//!
//! Plain data only. No IO, no clock.

mod catalog;
mod delta;
mod marketplace;
mod store;

pub use catalog::*;
pub use delta::*;
pub use marketplace::*;
pub use store::*;
