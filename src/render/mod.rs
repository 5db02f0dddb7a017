//! Render-side coordination
//!
//! The full-size target goes through the `RenderCoordinator`; the
//! constrained target reads from the `MobileSnapshotCache`. Both share one
//! `RosterBuilder` but guard their builds independently.

pub mod coordinator;
pub mod mobile_cache;
pub mod state;

pub use coordinator::{BuildOutcome, RenderCoordinator, RenderTarget, SkipReason};
pub use mobile_cache::MobileSnapshotCache;
pub use state::{RenderEvent, RenderState, RenderStateMachine};
