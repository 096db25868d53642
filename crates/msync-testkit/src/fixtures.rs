use msync_config::Credential;
use msync_rules::RuleBook;
use msync_schemas::{CatalogItem, Marketplace, PlatformBinding, Store};

use crate::MemoryCredentialStore;

/// Rules for all three marketplaces. Baemin is the strictest.
pub const SAMPLE_RULES_JSON: &str = r#"{
  "platforms": {
    "BAEMIN": {
      "price": { "min": 1000, "step": 100 },
      "name": { "maxLen": 30 },
      "desc": { "maxLen": 200 },
      "optionGroup": { "minSelect": 0, "maxSelect": 10, "maxGroupsPerItem": 5, "requireIfMinGt0": true },
      "option": { "maxOptionsPerGroup": 20, "priceDeltaStep": 100 }
    },
    "YOGIYO": {
      "price": { "min": 500, "step": 10 },
      "name": { "maxLen": 40 },
      "desc": { "maxLen": 300 },
      "optionGroup": { "minSelect": 0, "maxSelect": 20, "maxGroupsPerItem": 8 },
      "option": { "maxOptionsPerGroup": 30 }
    },
    "CEATS": {
      "price": { "min": 0, "step": 10 },
      "name": { "maxLen": 50 },
      "desc": { "maxLen": 500 },
      "optionGroup": { "minSelect": 0, "maxSelect": 20, "maxGroupsPerItem": 8 },
      "option": { "maxOptionsPerGroup": 30 }
    }
  }
}"#;

pub fn sample_rules() -> RuleBook {
    // The constant is fixed text; a parse failure is a bug in this crate.
    match RuleBook::from_json_str(SAMPLE_RULES_JSON) {
        Ok(book) => book,
        Err(err) => panic!("sample rules must parse: {err:#}"),
    }
}

/// `store-1` bound to Baemin (`SHOP-B`) and Yogiyo (`SHOP-Y`).
pub fn two_marketplace_store() -> Store {
    Store {
        id: "store-1".to_string(),
        name: "Seoul Kitchen".to_string(),
        bindings: vec![
            PlatformBinding::new(Marketplace::Baemin, "SHOP-B", "baemin_main"),
            PlatformBinding::new(Marketplace::Yogiyo, "SHOP-Y", "yogiyo_main"),
        ],
    }
}

/// Two items that pass every sample rule.
pub fn canonical_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("I1", "mains", "Bulgogi", "grilled beef", 9000).with_store("store-1"),
        CatalogItem::new("I2", "mains", "Bibimbap", "mixed rice", 8000).with_store("store-1"),
    ]
}

/// One credential per binding ref, username `<ref>-user`.
pub fn credentials_for(store: &Store) -> MemoryCredentialStore {
    let mut creds = MemoryCredentialStore::new();
    for binding in &store.bindings {
        creds.insert(
            binding.credential_ref.clone(),
            Credential::new(format!("{}-user", binding.credential_ref), "pw"),
        );
    }
    creds
}
