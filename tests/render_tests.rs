use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::Notify;

use trader_roster::builder::RosterBuilder;
use trader_roster::error::RosterError;
use trader_roster::mocks::{RecordingTarget, ScriptedEnrichment, ScriptedPresence, ScriptedSponsored};
use trader_roster::models::PresenceStatus;
use trader_roster::render::{BuildOutcome, MobileSnapshotCache, RenderCoordinator, RenderState, SkipReason};
use trader_roster::roster_store::PersistedRosterStore;
use trader_roster::simple_kv_storage::{KeyValueStore, MemoryStore};

/// Store whose reads panic while `broken` is set
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    broken: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str, default: Value) -> Value {
        if self.broken.load(Ordering::SeqCst) {
            panic!("store read failed");
        }
        self.inner.get(key, default)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), RosterError> {
        self.inner.set(key, value)
    }
}

struct Fixture {
    builder: Arc<RosterBuilder>,
    presence: Arc<ScriptedPresence>,
    enrichment: Arc<ScriptedEnrichment>,
}

fn fixture() -> Fixture {
    let store = Arc::new(PersistedRosterStore::new(Arc::new(MemoryStore::new())));
    store.add(1, Some("Alice")).unwrap();
    store.add(2, Some("Bob")).unwrap();

    let presence = Arc::new(ScriptedPresence::new());
    presence.set(1, PresenceStatus::Online, "3 minutes ago");
    presence.set(2, PresenceStatus::Idle, "20 minutes ago");
    let enrichment = Arc::new(ScriptedEnrichment::new());

    let builder = Arc::new(RosterBuilder::new(
        store,
        enrichment.clone(),
        presence.clone(),
        Arc::new(ScriptedSponsored::new(Vec::new())),
    ));
    Fixture {
        builder,
        presence,
        enrichment,
    }
}

#[tokio::test]
async fn test_coordinator_renders_once_then_skips_rendered_target() {
    let f = fixture();
    let coordinator = RenderCoordinator::new(f.builder.clone());
    let target = RecordingTarget::new();

    assert_eq!(coordinator.request_build(&target).await, BuildOutcome::Rendered);
    assert_eq!(
        coordinator.request_build(&target).await,
        BuildOutcome::Skipped(SkipReason::AlreadyRendered)
    );
    assert_eq!(target.render_count(), 1);
    assert_eq!(target.last().unwrap().online_count(), 2);
    assert_eq!(coordinator.state(), RenderState::Idle);

    // page dropped the element: the next signal builds again
    target.reset();
    assert_eq!(coordinator.request_build(&target).await, BuildOutcome::Rendered);
    assert_eq!(target.render_count(), 2);
}

#[tokio::test]
async fn test_request_while_building_is_noop() {
    let f = fixture();
    let gate = Arc::new(Notify::new());
    f.presence.set_gate(gate.clone());
    let coordinator = RenderCoordinator::new(f.builder.clone());
    let target = RecordingTarget::new();

    let (first, second) = tokio::join!(coordinator.request_build(&target), async {
        while coordinator.state() != RenderState::Building || f.presence.calls().len() < 2 {
            tokio::task::yield_now().await;
        }
        let second = coordinator.request_build(&target).await;
        gate.notify_waiters();
        second
    });

    assert_eq!(first, BuildOutcome::Rendered);
    assert_eq!(second, BuildOutcome::Skipped(SkipReason::InProgress));
    assert_eq!(target.render_count(), 1);
    // one build's worth of enrichment lookups
    assert_eq!(f.enrichment.calls(), vec![1, 2]);
    assert_eq!(coordinator.state(), RenderState::Idle);
}

#[tokio::test]
async fn test_panic_during_render_returns_to_idle() {
    let f = fixture();
    let coordinator = RenderCoordinator::new(f.builder.clone());
    let target = RecordingTarget::new();
    target.set_panic_on_render(true);

    let result = AssertUnwindSafe(coordinator.request_build(&target)).catch_unwind().await;
    assert!(result.is_err());
    assert_eq!(coordinator.state(), RenderState::Idle);

    target.set_panic_on_render(false);
    assert_eq!(coordinator.request_build(&target).await, BuildOutcome::Rendered);
}

#[tokio::test]
async fn test_dropped_build_returns_to_idle() {
    let f = fixture();
    let gate = Arc::new(Notify::new());
    f.presence.set_gate(gate);
    let coordinator = RenderCoordinator::new(f.builder.clone());
    let target = RecordingTarget::new();

    {
        let build = coordinator.request_build(&target);
        tokio::pin!(build);
        assert!(futures_util::poll!(build.as_mut()).is_pending());
        assert_eq!(coordinator.state(), RenderState::Building);
    }

    assert_eq!(coordinator.state(), RenderState::Idle);
    assert_eq!(target.render_count(), 0);
}

#[tokio::test]
async fn test_concurrent_cache_reads_share_one_build() {
    let f = fixture();
    let gate = Arc::new(Notify::new());
    f.presence.set_gate(gate.clone());
    let cache = MobileSnapshotCache::new(f.builder.clone());

    let (a, b, ()) = tokio::join!(cache.snapshot(), cache.snapshot(), async {
        while f.presence.calls().len() < 2 {
            tokio::task::yield_now().await;
        }
        gate.notify_waiters();
    });

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.builds_started(), 1);
    assert_eq!(f.enrichment.calls(), vec![1, 2]);
    assert_eq!(f.presence.calls().len(), 2);
}

#[tokio::test]
async fn test_cache_retains_snapshot_until_refresh() {
    let f = fixture();
    let cache = MobileSnapshotCache::new(f.builder.clone());
    assert!(cache.peek().is_none());

    let first = cache.snapshot().await;
    let again = cache.snapshot().await;
    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(&cache.peek().unwrap(), &first));
    assert_eq!(cache.builds_started(), 1);

    f.presence.set(2, PresenceStatus::Offline, "");
    let refreshed = cache.refresh().await;
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(refreshed.active_traders().len(), 1);
    assert_eq!(first.active_traders().len(), 2);
    assert!(Arc::ptr_eq(&cache.snapshot().await, &refreshed));
    assert_eq!(cache.builds_started(), 2);
}

#[tokio::test]
async fn test_failed_cache_build_is_not_kept() {
    let kv = Arc::new(FlakyStore::default());
    let store = Arc::new(PersistedRosterStore::new(kv.clone()));
    store.add(1, Some("Alice")).unwrap();
    let presence = Arc::new(ScriptedPresence::new());
    presence.set(1, PresenceStatus::Online, "1 minute ago");
    let builder = Arc::new(RosterBuilder::new(
        store,
        Arc::new(ScriptedEnrichment::new()),
        presence,
        Arc::new(ScriptedSponsored::new(Vec::new())),
    ));
    let cache = MobileSnapshotCache::new(builder);

    kv.broken.store(true, Ordering::SeqCst);
    let (a, b) = tokio::join!(cache.snapshot(), cache.snapshot());
    assert!(a.active_traders().is_empty());
    assert!(b.active_traders().is_empty());
    assert!(cache.peek().is_none());
    assert_eq!(cache.builds_started(), 1);

    kv.broken.store(false, Ordering::SeqCst);
    let recovered = cache.snapshot().await;
    assert_eq!(recovered.active_traders().len(), 1);
    assert_eq!(cache.builds_started(), 2);
    assert!(Arc::ptr_eq(&cache.peek().unwrap(), &recovered));
}

#[tokio::test]
async fn test_cache_render_into_target() {
    let f = fixture();
    let cache = MobileSnapshotCache::new(f.builder.clone());
    let target = RecordingTarget::new();

    cache.render_into(&target).await;
    cache.render_into(&target).await;

    assert_eq!(target.render_count(), 2);
    assert_eq!(cache.builds_started(), 1);
    let names: Vec<_> = target.last().unwrap().active_traders().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_coordinator_and_cache_guard_independently() {
    let f = fixture();
    let gate = Arc::new(Notify::new());
    f.presence.set_gate(gate.clone());
    let coordinator = RenderCoordinator::new(f.builder.clone());
    let cache = MobileSnapshotCache::new(f.builder.clone());
    let target = RecordingTarget::new();

    let (outcome, snapshot, ()) = tokio::join!(coordinator.request_build(&target), cache.snapshot(), async {
        // both builds are waiting on presence at the same time
        while f.presence.calls().len() < 4 {
            tokio::task::yield_now().await;
        }
        gate.notify_waiters();
    });

    assert_eq!(outcome, BuildOutcome::Rendered);
    assert_eq!(snapshot.online_count(), 2);
    assert_eq!(cache.builds_started(), 1);
}
