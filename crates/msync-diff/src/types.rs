use serde::{Deserialize, Serialize};

/// Price drift evidence for one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub item_id: String,
    pub old_price: i64,
    pub new_price: i64,
}

impl PriceChange {
    pub fn new(item_id: impl Into<String>, old_price: i64, new_price: i64) -> Self {
        Self {
            item_id: item_id.into(),
            old_price,
            new_price,
        }
    }
}

/// Availability drift evidence for one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityChange {
    pub item_id: String,
    pub old_available: bool,
    pub new_available: bool,
}

impl AvailabilityChange {
    pub fn new(item_id: impl Into<String>, old_available: bool, new_available: bool) -> Self {
        Self {
            item_id: item_id.into(),
            old_available,
            new_available,
        }
    }
}

/// Human/audit view of a delta. Never used to mutate anything.
///
/// All lists follow canonical input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Ids sent as full replacements.
    pub updated: Vec<String>,
    pub price_changed: Vec<PriceChange>,
    pub availability_changed: Vec<AvailabilityChange>,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
            && self.price_changed.is_empty()
            && self.availability_changed.is_empty()
    }

    /// Total number of recorded changes across all lists.
    pub fn change_count(&self) -> usize {
        self.updated.len() + self.price_changed.len() + self.availability_changed.len()
    }
}
