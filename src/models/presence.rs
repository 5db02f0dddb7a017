use serde::{Deserialize, Serialize};
use std::fmt;

use crate::relative_time;

/// Live status as reported by the presence endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresenceStatus {
    Online,
    Idle,
    Offline,
    Unknown,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Idle => "Idle",
            Self::Offline => "Offline",
            Self::Unknown => "Unknown",
        }
    }

    /// Maps the endpoint's status string; anything unexpected is Unknown
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Online" => Self::Online,
            "Idle" => Self::Idle,
            "Offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }

    /// Online and Idle traders are shown and counted
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Online | Self::Idle)
    }

    /// Sort priority: Online first, everything else after
    pub fn priority(&self) -> u8 {
        match self {
            Self::Online => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceInfo {
    pub status: PresenceStatus,
    /// Free-text age such as "5 minutes ago", or empty
    pub relative: String,
}

impl PresenceInfo {
    pub fn new(status: PresenceStatus, relative: impl Into<String>) -> Self {
        Self { status, relative: relative.into() }
    }

    /// Sentinel returned whenever presence could not be resolved
    pub fn unknown() -> Self {
        Self::new(PresenceStatus::Unknown, "")
    }

    /// Default for sponsored entries whose presence is unavailable
    pub fn offline_unknown() -> Self {
        Self::new(PresenceStatus::Offline, "Unknown")
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Parsed idle time in minutes, None when the text is unparsable
    pub fn idle_minutes(&self) -> Option<u64> {
        relative_time::relative_to_minutes(&self.relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire() {
        assert_eq!(PresenceStatus::from_wire("Online"), PresenceStatus::Online);
        assert_eq!(PresenceStatus::from_wire("Idle"), PresenceStatus::Idle);
        assert_eq!(PresenceStatus::from_wire("Offline"), PresenceStatus::Offline);
        assert_eq!(PresenceStatus::from_wire("online"), PresenceStatus::Unknown);
        assert_eq!(PresenceStatus::from_wire(""), PresenceStatus::Unknown);
    }

    #[test]
    fn test_priority_and_activity() {
        assert!(PresenceStatus::Online.priority() < PresenceStatus::Idle.priority());
        assert!(PresenceStatus::Idle.is_active());
        assert!(!PresenceStatus::Offline.is_active());
        assert!(!PresenceStatus::Unknown.is_active());
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(PresenceInfo::unknown().relative, "");
        let offline = PresenceInfo::offline_unknown();
        assert_eq!(offline.status, PresenceStatus::Offline);
        assert_eq!(offline.idle_minutes(), None);
        assert_eq!(PresenceInfo::new(PresenceStatus::Idle, "2 hours ago").idle_minutes(), Some(120));
    }
}
