pub mod sources;

pub use sources::{RecordingTarget, ScriptedEnrichment, ScriptedPresence, ScriptedSponsored};
