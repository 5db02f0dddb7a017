//! Roster Builder
//!
//! Merges the persisted roster, enrichment links and presence into one
//! `RosterSnapshot`. Every remote call degrades to its default, so `build`
//! always completes.

use futures_util::future::join_all;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use crate::clients::{EnrichmentSource, PresenceSource, RawAdTrader, SponsoredSource};
use crate::logging::LogEvent;
use crate::models::{AdTraderEntry, EnrichedTrader, PresenceInfo, RosterSnapshot, TraderEntry, TraderLinks};
use crate::relative_time::idle_sort_key;
use crate::roster_store::PersistedRosterStore;

pub struct RosterBuilder {
    store: Arc<PersistedRosterStore>,
    enrichment: Arc<dyn EnrichmentSource>,
    presence: Arc<dyn PresenceSource>,
    sponsored: Arc<dyn SponsoredSource>,
}

impl RosterBuilder {
    pub fn new(
        store: Arc<PersistedRosterStore>,
        enrichment: Arc<dyn EnrichmentSource>,
        presence: Arc<dyn PresenceSource>,
        sponsored: Arc<dyn SponsoredSource>,
    ) -> Self {
        Self {
            store,
            enrichment,
            presence,
            sponsored,
        }
    }

    pub fn store(&self) -> &Arc<PersistedRosterStore> {
        &self.store
    }

    /// Runs one full build
    pub async fn build(&self) -> RosterSnapshot {
        let started = Instant::now();

        let roster = self.store.list();
        let roster_size = roster.len();

        let enriched = self.enrich(roster).await;
        let mut active: Vec<EnrichedTrader> = self
            .resolve_presence(enriched)
            .await
            .into_iter()
            .filter(|t| t.presence.is_active())
            .collect();
        sort_active(&mut active);

        let (sponsored, sponsored_failed) = self.build_sponsored().await;
        let snapshot = RosterSnapshot::new(active, sponsored, sponsored_failed);

        log::info!(
            target: "roster",
            "{}",
            LogEvent::new("SNAPSHOT_BUILT")
                .field("roster_size", roster_size)
                .field("active", snapshot.active_traders().len())
                .field("sponsored", snapshot.sponsored().len())
                .field("sponsored_failed", snapshot.sponsored_failed())
                .field("online_count", snapshot.online_count())
                .field("elapsed_ms", started.elapsed().as_millis() as u64)
                .build()
        );

        snapshot
    }

    /// One lookup at a time, in roster order
    async fn enrich(&self, roster: Vec<TraderEntry>) -> Vec<(TraderEntry, TraderLinks)> {
        let mut enriched = Vec::with_capacity(roster.len());
        for entry in roster {
            let links = match AssertUnwindSafe(self.enrichment.lookup(entry.id)).catch_unwind().await {
                Ok(links) => links,
                Err(_) => {
                    log::warn!(target: "roster", "enrichment for trader {} failed, leaving links unset", entry.id);
                    TraderLinks::default()
                }
            };
            enriched.push((entry, links));
        }
        enriched
    }

    /// Fans out one presence lookup per trader and joins them all
    async fn resolve_presence(&self, enriched: Vec<(TraderEntry, TraderLinks)>) -> Vec<EnrichedTrader> {
        join_all(enriched.into_iter().map(|(entry, links)| async move {
            let presence = match AssertUnwindSafe(self.presence.resolve(entry.id)).catch_unwind().await {
                Ok(presence) => presence,
                Err(_) => {
                    log::warn!(target: "roster", "presence for trader {} failed, treating as Unknown", entry.id);
                    PresenceInfo::unknown()
                }
            };
            EnrichedTrader { entry, links, presence }
        }))
        .await
    }

    /// Sponsored list plus whether the branch failed as a whole
    async fn build_sponsored(&self) -> (Vec<AdTraderEntry>, bool) {
        match AssertUnwindSafe(self.resolve_sponsored()).catch_unwind().await {
            Ok(sponsored) => (sponsored, false),
            Err(_) => {
                log::error!(target: "roster", "sponsored roster branch panicked, showing error placeholder");
                (Vec::new(), true)
            }
        }
    }

    /// Sequential presence per sponsored entry; server order is kept as is
    async fn resolve_sponsored(&self) -> Vec<AdTraderEntry> {
        let raw = self.sponsored.list_sponsored().await;
        let mut sponsored = Vec::with_capacity(raw.len());
        for ad in raw {
            let presence = self.sponsored_presence(&ad).await;
            sponsored.push(ad.into_entry(presence));
        }
        sponsored
    }

    async fn sponsored_presence(&self, ad: &RawAdTrader) -> PresenceInfo {
        let Some(id) = ad.trader_id() else {
            return PresenceInfo::offline_unknown();
        };
        match AssertUnwindSafe(self.presence.resolve(id)).catch_unwind().await {
            Ok(presence) => presence,
            Err(_) => {
                log::warn!(target: "roster", "presence for sponsored trader {} failed, marking Offline", id);
                PresenceInfo::offline_unknown()
            }
        }
    }
}

/// Online before Idle, then shortest idle time first.
///
/// The sort is stable, so ties keep roster order.
pub fn sort_active(traders: &mut [EnrichedTrader]) {
    traders.sort_by_key(|t| (t.presence.status.priority(), idle_sort_key(&t.presence.relative)));
}
