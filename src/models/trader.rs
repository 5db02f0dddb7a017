use serde::{Deserialize, Serialize};

use crate::models::presence::PresenceInfo;

/// Remote-platform user id
pub type TraderId = i64;

/// A trader the user tracks, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderEntry {
    pub id: TraderId,
    pub name: String,
}

impl TraderEntry {
    /// Blank or missing names fall back to `User <id>`
    pub fn new(id: TraderId, name: Option<&str>) -> Self {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => Self::default_name(id),
        };
        Self { id, name }
    }

    pub fn default_name(id: TraderId) -> String {
        format!("User {}", id)
    }
}

/// Optional price / feedback links attached to a trader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_link: Option<String>,
}

impl TraderLinks {
    /// Empty strings are treated as absent
    pub fn new(price_link: Option<String>, feedback_link: Option<String>) -> Self {
        Self {
            price_link: price_link.filter(|l| !l.trim().is_empty()),
            feedback_link: feedback_link.filter(|l| !l.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_link.is_none() && self.feedback_link.is_none()
    }
}

/// Persisted entry plus links and presence, scoped to a single build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrader {
    #[serde(flatten)]
    pub entry: TraderEntry,
    #[serde(flatten)]
    pub links: TraderLinks,
    pub presence: PresenceInfo,
}

impl EnrichedTrader {
    pub fn id(&self) -> TraderId {
        self.entry.id
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// Sponsored trader, kept in the order the server sent it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdTraderEntry {
    pub id: Option<TraderId>,
    pub name: String,
    #[serde(flatten)]
    pub links: TraderLinks,
    pub presence: PresenceInfo,
}

impl AdTraderEntry {
    /// Name shown for the entry; blank names render as `Trader`
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Trader"
        } else {
            &self.name
        }
    }
}
