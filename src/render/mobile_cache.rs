//! Single-flight snapshot cache for the constrained-viewport target.
//!
//! Callers that ask for a snapshot while a build is running await that same
//! build. The resolved snapshot is kept until `refresh` is called; there is
//! no expiry. A build that panics is not kept.

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::builder::RosterBuilder;
use crate::models::RosterSnapshot;
use crate::render::coordinator::RenderTarget;

type SnapshotFuture = Shared<BoxFuture<'static, Option<Arc<RosterSnapshot>>>>;

pub struct MobileSnapshotCache {
    builder: Arc<RosterBuilder>,
    /// In-flight or most recent build, tagged with its build number
    current: Mutex<Option<(u64, SnapshotFuture)>>,
    builds_started: AtomicU64,
}

impl MobileSnapshotCache {
    pub fn new(builder: Arc<RosterBuilder>) -> Self {
        Self {
            builder,
            current: Mutex::new(None),
            builds_started: AtomicU64::new(0),
        }
    }

    /// Cached snapshot, joining or starting a build if none has resolved
    pub async fn snapshot(&self) -> Arc<RosterSnapshot> {
        let (build_no, pending) = {
            let mut current = self.lock();
            match current.as_ref() {
                Some((build_no, pending)) => (*build_no, pending.clone()),
                None => {
                    let (build_no, pending) = self.start_build();
                    *current = Some((build_no, pending.clone()));
                    (build_no, pending)
                }
            }
        };
        self.settle(build_no, pending.await)
    }

    /// Starts a new build that replaces the cached snapshot.
    ///
    /// Callers already awaiting the previous build still get its result.
    pub async fn refresh(&self) -> Arc<RosterSnapshot> {
        let (build_no, pending) = self.start_build();
        *self.lock() = Some((build_no, pending.clone()));
        self.settle(build_no, pending.await)
    }

    /// Resolved snapshot, without starting or waiting for a build
    pub fn peek(&self) -> Option<Arc<RosterSnapshot>> {
        self.lock()
            .as_ref()
            .and_then(|(_, pending)| pending.peek().cloned().flatten())
    }

    pub async fn render_into(&self, target: &dyn RenderTarget) {
        let snapshot = self.snapshot().await;
        target.render(&snapshot);
    }

    /// Number of builds started over the cache's lifetime
    pub fn builds_started(&self) -> u64 {
        self.builds_started.load(Ordering::Relaxed)
    }

    fn start_build(&self) -> (u64, SnapshotFuture) {
        let build_no = self.builds_started.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!(target: "mobile_cache", "starting snapshot build #{}", build_no);
        let builder = Arc::clone(&self.builder);
        let pending = async move {
            match AssertUnwindSafe(builder.build()).catch_unwind().await {
                Ok(snapshot) => Some(Arc::new(snapshot)),
                Err(_) => {
                    log::error!(target: "mobile_cache", "snapshot build #{} panicked", build_no);
                    None
                }
            }
        }
        .boxed()
        .shared();
        (build_no, pending)
    }

    /// A failed build is dropped from the slot so the next read starts over;
    /// its waiters get an empty snapshot.
    fn settle(&self, build_no: u64, result: Option<Arc<RosterSnapshot>>) -> Arc<RosterSnapshot> {
        if let Some(snapshot) = result {
            return snapshot;
        }
        let mut current = self.lock();
        if matches!(current.as_ref(), Some((n, _)) if *n == build_no) {
            *current = None;
        }
        Arc::new(RosterSnapshot::empty())
    }

    fn lock(&self) -> MutexGuard<'_, Option<(u64, SnapshotFuture)>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
