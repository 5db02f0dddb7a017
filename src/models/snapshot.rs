use serde::Serialize;

use crate::display;
use crate::models::trader::{AdTraderEntry, EnrichedTrader};

/// One complete, immutable build result.
///
/// `online_count` is derived at construction so it always equals the active
/// traders plus the active sponsored entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSnapshot {
    active_traders: Vec<EnrichedTrader>,
    online_count: usize,
    sponsored: Vec<AdTraderEntry>,
    sponsored_failed: bool,
}

impl RosterSnapshot {
    pub fn new(
        active_traders: Vec<EnrichedTrader>,
        sponsored: Vec<AdTraderEntry>,
        sponsored_failed: bool,
    ) -> Self {
        let sponsored_active = sponsored.iter().filter(|ad| ad.presence.is_active()).count();
        Self {
            online_count: active_traders.len() + sponsored_active,
            active_traders,
            sponsored,
            sponsored_failed,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), false)
    }

    pub fn active_traders(&self) -> &[EnrichedTrader] {
        &self.active_traders
    }

    pub fn online_count(&self) -> usize {
        self.online_count
    }

    pub fn sponsored(&self) -> &[AdTraderEntry] {
        &self.sponsored
    }

    /// True when the sponsored branch failed outright
    pub fn sponsored_failed(&self) -> bool {
        self.sponsored_failed
    }

    /// Placeholder to show instead of the active list, if any
    pub fn active_placeholder(&self) -> Option<&'static str> {
        if self.active_traders.is_empty() {
            Some(display::NO_ACTIVE_TRADERS)
        } else {
            None
        }
    }

    /// Placeholder to show instead of the sponsored list, if any
    pub fn sponsored_placeholder(&self) -> Option<&'static str> {
        if self.sponsored_failed {
            Some(display::SPONSORED_LOAD_ERROR)
        } else if self.sponsored.is_empty() {
            Some(display::NO_SPONSORED_TRADERS)
        } else {
            None
        }
    }
}
