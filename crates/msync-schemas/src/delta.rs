use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::CatalogItem;

/// Minimal change set bringing one marketplace in line with the canonical
/// catalog.
///
/// The four views overlap on purpose: adapters consume whichever subset their
/// portal supports. `sold_out_items` is always the negation of
/// `toggled_items` for the same ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedDelta {
    /// New or substantively changed items, full replacement, canonical order.
    pub updated_items: Vec<CatalogItem>,
    /// item id -> new availability
    pub toggled_items: BTreeMap<String, bool>,
    /// item id -> new price
    pub price_updates: BTreeMap<String, i64>,
    /// item id -> sold out
    pub sold_out_items: BTreeMap<String, bool>,
}

impl UnifiedDelta {
    pub fn is_empty(&self) -> bool {
        self.updated_items.is_empty()
            && self.toggled_items.is_empty()
            && self.price_updates.is_empty()
            && self.sold_out_items.is_empty()
    }

    /// True when any view references `item_id`.
    pub fn references(&self, item_id: &str) -> bool {
        self.updated_items.iter().any(|i| i.id == item_id)
            || self.toggled_items.contains_key(item_id)
            || self.price_updates.contains_key(item_id)
            || self.sold_out_items.contains_key(item_id)
    }
}

/// What an adapter reports after a mutating call.
///
/// - success: everything applied, `errors` empty.
/// - partial: `success == false && partial == true`; ids missing on the
///   remote side are listed in `errors`, the rest was applied.
/// - total failure: `success == false && partial == false`, nothing applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub success: bool,
    #[serde(default)]
    pub partial: bool,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ApplyResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            partial: false,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            partial: false,
            message: message.into(),
            errors,
        }
    }

    /// Success when `errors` is empty, partial otherwise.
    pub fn from_errors(message: impl Into<String>, errors: Vec<String>) -> Self {
        let partial = !errors.is_empty();
        Self {
            success: !partial,
            partial,
            message: message.into(),
            errors,
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.success && self.partial
    }
}
