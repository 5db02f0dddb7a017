//! Render Coordinator
//!
//! Keeps a full-size render target to one build at a time. Re-render signals
//! arrive in bursts from the page; every one that lands while a build is in
//! flight, or after the target is already rendered, is dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::builder::RosterBuilder;
use crate::models::RosterSnapshot;
use crate::render::state::{RenderEvent, RenderState, RenderStateMachine};

/// A presentation surface that accepts snapshots
pub trait RenderTarget: Send + Sync {
    /// True once the target carries a rendered roster
    fn is_rendered(&self) -> bool;

    fn render(&self, snapshot: &RosterSnapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyRendered,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Rendered,
    Skipped(SkipReason),
}

pub struct RenderCoordinator {
    builder: Arc<RosterBuilder>,
    machine: Mutex<RenderStateMachine>,
}

impl RenderCoordinator {
    pub fn new(builder: Arc<RosterBuilder>) -> Self {
        Self {
            builder,
            machine: Mutex::new(RenderStateMachine::new()),
        }
    }

    pub fn state(&self) -> RenderState {
        lock(&self.machine).state()
    }

    /// Builds a snapshot and hands it to `target`, unless the target is
    /// already rendered or a build is running.
    pub async fn request_build(&self, target: &dyn RenderTarget) -> BuildOutcome {
        if target.is_rendered() {
            return BuildOutcome::Skipped(SkipReason::AlreadyRendered);
        }
        let Some(_guard) = self.try_begin() else {
            log::debug!(target: "render", "build already in progress, request dropped");
            return BuildOutcome::Skipped(SkipReason::InProgress);
        };

        let snapshot = self.builder.build().await;
        target.render(&snapshot);
        BuildOutcome::Rendered
    }

    fn try_begin(&self) -> Option<BuildingGuard<'_>> {
        lock(&self.machine).consume(RenderEvent::Start).ok()?;
        Some(BuildingGuard { machine: &self.machine })
    }
}

/// Returns the machine to Idle when dropped, including on unwind or when the
/// build future is dropped mid-flight.
struct BuildingGuard<'a> {
    machine: &'a Mutex<RenderStateMachine>,
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = lock(self.machine).consume(RenderEvent::Finish) {
            log::error!(target: "render", "render cycle cleanup failed: {}", e);
        }
    }
}

fn lock(machine: &Mutex<RenderStateMachine>) -> MutexGuard<'_, RenderStateMachine> {
    machine.lock().unwrap_or_else(|e| e.into_inner())
}
