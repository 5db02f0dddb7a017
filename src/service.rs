//! Trader roster facade
//!
//! Wires the store, clients, builder, coordinator and mobile cache from one
//! `AppConfig`, and exposes the entry points the page integration calls.

use std::sync::Arc;
use std::time::Duration;

use crate::builder::RosterBuilder;
use crate::clients::{
    AdRosterClient, CredentialSource, EnrichmentSource, FixedCredential, PresenceClient, PresenceSource,
    SponsoredSource, TraderEnrichmentClient,
};
use crate::configure::AppConfig;
use crate::display;
use crate::error::RosterError;
use crate::models::{RosterSnapshot, TraderEntry, TraderId};
use crate::net::{JsonFetcher, ReqwestFetcher};
use crate::render::{BuildOutcome, MobileSnapshotCache, RenderCoordinator, RenderTarget, SkipReason};
use crate::roster_store::{PersistedRosterStore, ToggleAction};
use crate::simple_kv_storage::{KeyValueStore, SledDb};

/// Which render target a page width maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Full,
    Constrained,
}

impl Viewport {
    /// Widths below `threshold` are constrained
    pub fn from_width(width: u32, threshold: u32) -> Self {
        if width < threshold {
            Self::Constrained
        } else {
            Self::Full
        }
    }
}

pub struct TraderRoster {
    store: Arc<PersistedRosterStore>,
    builder: Arc<RosterBuilder>,
    coordinator: RenderCoordinator,
    mobile_cache: MobileSnapshotCache,
    mobile_width_threshold: u32,
}

impl TraderRoster {
    pub fn new(
        store: Arc<PersistedRosterStore>,
        enrichment: Arc<dyn EnrichmentSource>,
        presence: Arc<dyn PresenceSource>,
        sponsored: Arc<dyn SponsoredSource>,
        mobile_width_threshold: u32,
    ) -> Self {
        let builder = Arc::new(RosterBuilder::new(Arc::clone(&store), enrichment, presence, sponsored));
        Self {
            store,
            coordinator: RenderCoordinator::new(Arc::clone(&builder)),
            mobile_cache: MobileSnapshotCache::new(Arc::clone(&builder)),
            builder,
            mobile_width_threshold,
        }
    }

    /// Sled-backed store and reqwest clients, as configured
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(SledDb::new(&config.storage_path)?);
        let fetcher: Arc<dyn JsonFetcher> =
            Arc::new(ReqwestFetcher::new(Duration::from_secs(config.request_timeout_secs))?);
        Ok(Self::with_collaborators(config, kv, fetcher))
    }

    /// Real clients over the given storage and network collaborators
    pub fn with_collaborators(
        config: &AppConfig,
        kv: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn JsonFetcher>,
    ) -> Self {
        let store = Arc::new(PersistedRosterStore::new(kv));
        let credentials: Arc<dyn CredentialSource> = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                Arc::new(FixedCredential::new(Some(key.to_string()))) as Arc<dyn CredentialSource>
            }
            _ => Arc::clone(&store) as Arc<dyn CredentialSource>,
        };

        let presence = PresenceClient::new(Arc::clone(&fetcher), &config.presence_base_url, credentials);
        let enrichment = TraderEnrichmentClient::new(Arc::clone(&fetcher), &config.trader_info_base_url);
        let sponsored = AdRosterClient::new(fetcher, &config.trader_info_base_url, config.sponsored_limit);

        Self::new(
            store,
            Arc::new(enrichment),
            Arc::new(presence),
            Arc::new(sponsored),
            config.mobile_width_threshold,
        )
    }

    pub fn builder(&self) -> &Arc<RosterBuilder> {
        &self.builder
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    pub fn mobile_cache(&self) -> &MobileSnapshotCache {
        &self.mobile_cache
    }

    pub fn viewport(&self, width: u32) -> Viewport {
        Viewport::from_width(width, self.mobile_width_threshold)
    }

    pub fn traders(&self) -> Vec<TraderEntry> {
        self.store.list()
    }

    pub fn is_tracked(&self, id: TraderId) -> bool {
        self.store.contains(id)
    }

    /// Adds a trader; returns the confirmation text, or None if already tracked
    pub fn add_trader(&self, id: TraderId, name: Option<&str>) -> Result<Option<String>, RosterError> {
        if !self.store.add(id, name)? {
            return Ok(None);
        }
        let entry = self.store.get(id)?;
        Ok(Some(display::added_message(&entry.name)))
    }

    /// Removes a trader; returns the confirmation text, or None if not tracked
    pub fn remove_trader(&self, id: TraderId) -> Result<Option<String>, RosterError> {
        Ok(self.store.remove(id)?.then(|| display::REMOVED_MESSAGE.to_string()))
    }

    /// Profile-page button: `raw_name` is the page heading, cleaned here
    pub fn toggle_trader(&self, id: TraderId, raw_name: Option<&str>) -> Result<ToggleAction, RosterError> {
        let name = raw_name.and_then(display::clean_profile_name);
        self.store.toggle(id, name.as_deref())
    }

    pub fn set_credential(&self, key: &str) -> Result<(), RosterError> {
        self.store.set_credential(key)
    }

    /// Re-render signal from the page.
    ///
    /// Full viewports build into `full` through the coordinator; constrained
    /// ones fill `constrained` from the cache if it has not been filled yet.
    pub async fn refresh(
        &self,
        width: u32,
        full: &dyn RenderTarget,
        constrained: &dyn RenderTarget,
    ) -> BuildOutcome {
        match self.viewport(width) {
            Viewport::Full => self.coordinator.request_build(full).await,
            Viewport::Constrained => {
                if constrained.is_rendered() {
                    return BuildOutcome::Skipped(SkipReason::AlreadyRendered);
                }
                self.mobile_cache.render_into(constrained).await;
                BuildOutcome::Rendered
            }
        }
    }

    /// Explicit user refresh of the constrained view
    pub async fn reload_constrained(&self, constrained: &dyn RenderTarget) -> Arc<RosterSnapshot> {
        let snapshot = self.mobile_cache.refresh().await;
        constrained.render(&snapshot);
        snapshot
    }
}
