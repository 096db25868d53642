use anyhow::{bail, Result};
use msync_schemas::Marketplace;
use std::collections::BTreeMap;

use crate::MarketplaceAdapter;

/// Marketplace id -> adapter instance. At most one adapter per marketplace.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<Marketplace, Box<dyn MarketplaceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under `adapter.marketplace()`, replacing any previous one.
    pub fn register(&mut self, adapter: Box<dyn MarketplaceAdapter>) {
        self.adapters.insert(adapter.marketplace(), adapter);
    }

    pub fn with(mut self, adapter: Box<dyn MarketplaceAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn contains(&self, marketplace: Marketplace) -> bool {
        self.adapters.contains_key(&marketplace)
    }

    pub fn marketplaces(&self) -> Vec<Marketplace> {
        self.adapters.keys().copied().collect()
    }

    pub fn get_mut(
        &mut self,
        marketplace: Marketplace,
    ) -> Result<&mut (dyn MarketplaceAdapter + 'static)> {
        match self.adapters.get_mut(&marketplace) {
            Some(adapter) => Ok(adapter.as_mut()),
            None => bail!("ADAPTER_NOT_REGISTERED: no adapter for {marketplace}"),
        }
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("marketplaces", &self.marketplaces())
            .finish()
    }
}
