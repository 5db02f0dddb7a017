/// Scripted collaborators for testing the builder, coordinator and cache
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::clients::{EnrichmentSource, PresenceSource, RawAdTrader, SponsoredSource};
use crate::models::{PresenceInfo, PresenceStatus, RosterSnapshot, TraderId, TraderLinks};
use crate::render::RenderTarget;

/// Presence answers per trader id; unscripted ids resolve to Unknown
#[derive(Default)]
pub struct ScriptedPresence {
    answers: Mutex<HashMap<TraderId, PresenceInfo>>,
    panics: Mutex<HashSet<TraderId>>,
    calls: Mutex<Vec<TraderId>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: TraderId, status: PresenceStatus, relative: &str) {
        self.answers.lock().unwrap().insert(id, PresenceInfo::new(status, relative));
    }

    /// Lookups for `id` panic instead of answering
    pub fn panic_on(&self, id: TraderId) {
        self.panics.lock().unwrap().insert(id);
    }

    /// Every lookup records its call, then waits on `gate` before answering
    pub fn set_gate(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<TraderId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PresenceSource for ScriptedPresence {
    async fn resolve(&self, id: TraderId) -> PresenceInfo {
        self.calls.lock().unwrap().push(id);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.panics.lock().unwrap().contains(&id) {
            panic!("scripted presence panic for trader {}", id);
        }
        self.answers
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(PresenceInfo::unknown)
    }
}

/// Links per trader id; tracks how many lookups overlap
#[derive(Default)]
pub struct ScriptedEnrichment {
    links: Mutex<HashMap<TraderId, TraderLinks>>,
    calls: Mutex<Vec<TraderId>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedEnrichment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: TraderId, links: TraderLinks) {
        self.links.lock().unwrap().insert(id, links);
    }

    pub fn calls(&self) -> Vec<TraderId> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrichmentSource for ScriptedEnrichment {
    async fn lookup(&self, id: TraderId) -> TraderLinks {
        self.calls.lock().unwrap().push(id);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.links.lock().unwrap().get(&id).cloned().unwrap_or_default()
    }
}

/// Fixed sponsored list, optionally panicking instead
#[derive(Default)]
pub struct ScriptedSponsored {
    ads: Mutex<Vec<RawAdTrader>>,
    panic: AtomicBool,
}

impl ScriptedSponsored {
    pub fn new(ads: Vec<RawAdTrader>) -> Self {
        Self {
            ads: Mutex::new(ads),
            panic: AtomicBool::new(false),
        }
    }

    pub fn set_panic(&self, panic: bool) {
        self.panic.store(panic, Ordering::SeqCst);
    }
}

#[async_trait]
impl SponsoredSource for ScriptedSponsored {
    async fn list_sponsored(&self) -> Vec<RawAdTrader> {
        if self.panic.load(Ordering::SeqCst) {
            panic!("scripted sponsored panic");
        }
        self.ads.lock().unwrap().clone()
    }
}

/// Render target that keeps every snapshot it receives
#[derive(Default)]
pub struct RecordingTarget {
    rendered: AtomicBool,
    snapshots: Mutex<Vec<RosterSnapshot>>,
    panic_on_render: AtomicBool,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the rendered marker, as when the page drops the element
    pub fn reset(&self) {
        self.rendered.store(false, Ordering::SeqCst);
    }

    pub fn set_panic_on_render(&self, panic: bool) {
        self.panic_on_render.store(panic, Ordering::SeqCst);
    }

    pub fn render_count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<RosterSnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }
}

impl RenderTarget for RecordingTarget {
    fn is_rendered(&self) -> bool {
        self.rendered.load(Ordering::SeqCst)
    }

    fn render(&self, snapshot: &RosterSnapshot) {
        if self.panic_on_render.load(Ordering::SeqCst) {
            panic!("scripted render panic");
        }
        self.snapshots.lock().unwrap().push(snapshot.clone());
        self.rendered.store(true, Ordering::SeqCst);
    }
}
