use serde::{Deserialize, Serialize};

use crate::Marketplace;

/// One sellable item of the canonical catalog.
///
/// `price` is in the smallest currency unit. `id` is unique within a
/// snapshot; nothing here enforces it, the diff engine relies on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub store_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(alias = "desc")]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default, alias = "options")]
    pub option_groups: Vec<OptionGroup>,
    #[serde(default)]
    pub external_mappings: Vec<ItemMapping>,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        category_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id: id.into(),
            store_id: String::new(),
            category_id: category_id.into(),
            name: name.into(),
            description: description.into(),
            price,
            sku: None,
            image_url: None,
            available: true,
            option_groups: Vec::new(),
            external_mappings: Vec::new(),
        }
    }

    pub fn with_store(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = store_id.into();
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.option_groups.push(group);
        self
    }
}

/// A selectable group of options attached to an item ("size", "toppings").
///
/// `min <= max` is checked by validation, not here: a violating group is a
/// reportable catalog defect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: String,
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub options: Vec<ItemOption>,
}

impl OptionGroup {
    pub fn new(
        id: impl Into<String>,
        item_id: impl Into<String>,
        name: impl Into<String>,
        min: u32,
        max: u32,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            item_id: item_id.into(),
            name: name.into(),
            min,
            max,
            required,
            sort: 0,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: ItemOption) -> Self {
        self.options.push(option);
        self
    }
}

/// A single choice inside an option group. `price_delta` may be negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOption {
    pub id: String,
    pub group_id: String,
    pub name: String,
    #[serde(default)]
    pub price_delta: i64,
    #[serde(default)]
    pub default: bool,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl ItemOption {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        name: impl Into<String>,
        price_delta: i64,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            name: name.into(),
            price_delta,
            default: false,
            available: true,
        }
    }
}

/// Category an item is listed under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub store_id: String,
    pub name: String,
    #[serde(default)]
    pub sort: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Marketplace-side identifier of a canonical item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMapping {
    #[serde(alias = "platform")]
    pub marketplace: Marketplace,
    pub external_id: String,
}

fn default_true() -> bool {
    true
}
