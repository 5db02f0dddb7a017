use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::RosterError;
use crate::models::{AdTraderEntry, PresenceInfo, TraderId, TraderLinks};
use crate::net::JsonFetcher;

pub const DEFAULT_SPONSORED_LIMIT: usize = 5;

/// One sponsored trader as received, before presence is attached
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAdTrader {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trader_price_link: Option<String>,
    #[serde(default)]
    pub trader_feedback_link: Option<String>,
}

impl RawAdTrader {
    /// `userId` as a number or numeric string; zero is absent
    pub fn trader_id(&self) -> Option<TraderId> {
        self.user_id.as_ref().and_then(parse_id)
    }

    pub fn into_entry(self, presence: PresenceInfo) -> AdTraderEntry {
        AdTraderEntry {
            id: self.trader_id(),
            name: self.name.unwrap_or_default(),
            links: TraderLinks::new(self.trader_price_link, self.trader_feedback_link),
            presence,
        }
    }
}

fn parse_id(value: &Value) -> Option<TraderId> {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }?;
    (id != 0).then_some(id)
}

/// Integer prefix of `s` after leading whitespace, e.g. "123abc" -> 123
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Supplies the sponsored roster, capped and in server order
#[async_trait]
pub trait SponsoredSource: Send + Sync {
    async fn list_sponsored(&self) -> Vec<RawAdTrader>;
}

pub struct AdRosterClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    limit: usize,
}

impl AdRosterClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: &str, limit: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
        }
    }

    fn list_url(&self) -> String {
        format!("{}/GetAdTraders", self.base_url)
    }

    pub async fn fetch(&self) -> Result<Vec<RawAdTrader>, RosterError> {
        let reply = self.fetcher.get_json(&self.list_url()).await;
        let items = match reply.body {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(RosterError::ParseFailure("expected a JSON array".to_string())),
            None if reply.is_transport_failure() => {
                return Err(RosterError::NetworkFailure("no response".to_string()))
            }
            None => return Err(RosterError::ParseFailure(format!("HTTP {} with non-JSON body", reply.status))),
        };

        Ok(items
            .into_iter()
            .take(self.limit)
            .filter_map(|item| match serde_json::from_value::<RawAdTrader>(item) {
                Ok(ad) => Some(ad),
                Err(e) => {
                    log::debug!(target: "sponsored", "skipping malformed sponsored entry: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl SponsoredSource for AdRosterClient {
    async fn list_sponsored(&self) -> Vec<RawAdTrader> {
        match self.fetch().await {
            Ok(list) => list,
            Err(e) => {
                log::warn!(target: "sponsored", "sponsored roster unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
