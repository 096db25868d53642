use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External marketplace the canonical catalog is mirrored to.
///
/// Serialized as the upper-case code used in store files, rule schemas and
/// audit entity keys (`BAEMIN`, `YOGIYO`, `CEATS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Marketplace {
    Baemin,
    Yogiyo,
    Ceats,
}

impl Marketplace {
    pub const ALL: [Marketplace; 3] = [Marketplace::Baemin, Marketplace::Yogiyo, Marketplace::Ceats];

    pub fn as_str(&self) -> &'static str {
        match self {
            Marketplace::Baemin => "BAEMIN",
            Marketplace::Yogiyo => "YOGIYO",
            Marketplace::Ceats => "CEATS",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a marketplace code does not name a known marketplace.
///
/// This is a deployment defect (bad store file or config), never a catalog
/// defect, so callers propagate it instead of reporting it per item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMarketplace {
    pub code: String,
}

impl fmt::Display for UnknownMarketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MARKETPLACE_UNKNOWN: '{}' (expected one of: BAEMIN | YOGIYO | CEATS)",
            self.code
        )
    }
}

impl std::error::Error for UnknownMarketplace {}

impl FromStr for Marketplace {
    type Err = UnknownMarketplace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Marketplace::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| UnknownMarketplace {
                code: s.to_string(),
            })
    }
}
