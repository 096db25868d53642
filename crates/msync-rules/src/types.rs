use anyhow::{bail, Context, Result};
use msync_schemas::{CatalogItem, Marketplace};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::validate_items;

/// `price { min, step }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceRules {
    pub min: i64,
    /// Prices must sit on `min + k * step`. Must be positive.
    pub step: i64,
}

/// `name { maxLen }` / `desc { maxLen }`. Lengths count characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LengthRules {
    pub max_len: usize,
}

/// `optionGroup { ... }`. The cardinality limits are required;
/// `requireIfMinGt0` defaults to off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionGroupRules {
    pub min_select: u32,
    pub max_select: u32,
    pub max_groups_per_item: usize,
    #[serde(default)]
    pub require_if_min_gt0: bool,
}

/// `option { ... }`. An absent or zero `priceDeltaStep` disables the step
/// check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionRules {
    pub max_options_per_group: usize,
    #[serde(default)]
    pub price_delta_step: Option<i64>,
}

impl OptionRules {
    /// Effective step, `None` when unset or zero.
    pub fn delta_step(&self) -> Option<i64> {
        self.price_delta_step.filter(|s| *s != 0)
    }
}

/// Rule set for one marketplace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarketplaceRules {
    pub price: PriceRules,
    pub name: LengthRules,
    pub desc: LengthRules,
    pub option_group: OptionGroupRules,
    pub option: OptionRules,
}

/// The whole rules document: `{"platforms": {"<MARKETPLACE>": {...}}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleBook {
    pub platforms: BTreeMap<Marketplace, MarketplaceRules>,
}

impl RuleBook {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("RULES_READ_FAILED: {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("RULES_INVALID: {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let book: RuleBook =
            serde_json::from_str(raw).context("RULES_INVALID: rules document does not parse")?;
        book.check()?;
        Ok(book)
    }

    pub fn from_value(v: Value) -> Result<Self> {
        let book: RuleBook =
            serde_json::from_value(v).context("RULES_INVALID: rules document does not parse")?;
        book.check()?;
        Ok(book)
    }

    fn check(&self) -> Result<()> {
        for (marketplace, rules) in &self.platforms {
            if rules.price.step <= 0 {
                bail!(
                    "RULES_INVALID: platforms.{marketplace}.price.step must be positive (got {})",
                    rules.price.step
                );
            }
        }
        Ok(())
    }

    pub fn rules_for(
        &self,
        marketplace: Marketplace,
    ) -> Result<&MarketplaceRules, UnknownMarketplaceRules> {
        self.platforms
            .get(&marketplace)
            .ok_or(UnknownMarketplaceRules { marketplace })
    }

    pub fn has(&self, marketplace: Marketplace) -> bool {
        self.platforms.contains_key(&marketplace)
    }

    /// Validate `items` against `marketplace`'s rules.
    ///
    /// `Err` only when the rule book has no entry for `marketplace`.
    pub fn validate(
        &self,
        marketplace: Marketplace,
        items: &[CatalogItem],
    ) -> Result<Vec<ValidationIssue>, UnknownMarketplaceRules> {
        let rules = self.rules_for(marketplace)?;
        Ok(validate_items(rules, items))
    }
}

/// The rule book has no section for a marketplace a binding references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMarketplaceRules {
    pub marketplace: Marketplace,
}

impl fmt::Display for UnknownMarketplaceRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RULES_MARKETPLACE_MISSING: no rules defined for {}",
            self.marketplace
        )
    }
}

impl std::error::Error for UnknownMarketplaceRules {}

/// One business-rule violation. Descriptive only.
///
/// `field` is `price`, `name`, `desc`, `optionGroup`, `optionGroup:<group id>`
/// or `option:<option id>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub item_id: String,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        item_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.item_id, self.field, self.message)
    }
}
