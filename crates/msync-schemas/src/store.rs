use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CatalogItem, Marketplace};

/// Association of a store with one marketplace shop.
///
/// Immutable for the duration of a sync request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBinding {
    #[serde(alias = "platform")]
    pub marketplace: Marketplace,
    #[serde(alias = "shopId")]
    pub shop_id: String,
    #[serde(alias = "credRef", alias = "cred_ref")]
    pub credential_ref: String,
}

impl PlatformBinding {
    pub fn new(
        marketplace: Marketplace,
        shop_id: impl Into<String>,
        credential_ref: impl Into<String>,
    ) -> Self {
        Self {
            marketplace,
            shop_id: shop_id.into(),
            credential_ref: credential_ref.into(),
        }
    }

    /// Audit entity key: `<MARKETPLACE>:<shop_id>`.
    pub fn entity_key(&self) -> String {
        format!("{}:{}", self.marketplace, self.shop_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bindings: Vec<PlatformBinding>,
}

/// On-disk store definition: the store, its bindings and the canonical items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub store: Store,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Break window inside one day's opening hours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreak {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Opening hours for one day of the week (`dow` 1 = Monday .. 7 = Sunday).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub store_id: String,
    pub dow: u8,
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
    #[serde(default)]
    pub break_times: Vec<HoursBreak>,
    #[serde(default)]
    pub holiday: bool,
}

impl OperatingHours {
    /// Same hours for every day of the week, no breaks.
    pub fn every_day(store_id: &str, open: NaiveTime, close: NaiveTime) -> Vec<Self> {
        (1..=7)
            .map(|dow| Self {
                store_id: store_id.to_string(),
                dow,
                open,
                close,
                break_times: Vec::new(),
                holiday: false,
            })
            .collect()
    }
}

/// Pause state of one marketplace shop.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub store_id: String,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl StoreState {
    pub fn open(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseCommand {
    pub store_id: String,
    pub paused: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursCommand {
    pub store_id: String,
    pub hours: Vec<OperatingHours>,
}

/// Last-fetched state of one marketplace shop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    #[serde(alias = "platform")]
    pub marketplace: Marketplace,
    pub store_id: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub hours: Vec<OperatingHours>,
    pub state: StoreState,
}

impl PlatformSnapshot {
    pub fn empty(marketplace: Marketplace, store_id: impl Into<String>) -> Self {
        let store_id = store_id.into();
        Self {
            marketplace,
            state: StoreState::open(store_id.clone()),
            store_id,
            items: Vec::new(),
            hours: Vec::new(),
        }
    }
}

/// Persisted copy of the canonical catalog for one store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub store_id: String,
    pub items: Vec<CatalogItem>,
    pub saved_at_utc: DateTime<Utc>,
}

/// Authenticated marketplace session. **The token is redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub marketplace: Marketplace,
    pub shop_id: String,
    pub token: String,
    pub selector_version: String,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("marketplace", &self.marketplace)
            .field("shop_id", &self.shop_id)
            .field("token", &"<REDACTED>")
            .field("selector_version", &self.selector_version)
            .finish()
    }
}

/// `HH:MM` wall-clock times, the format store files and marketplace state use.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Accepts `HH:MM` and `HH:MM:SS`.
    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
    }
}
