use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::RosterError;
use crate::models::{TraderId, TraderLinks};
use crate::net::JsonFetcher;

/// Looks up optional price / feedback links for a trader
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Empty links when the lookup fails or the trader has none
    async fn lookup(&self, id: TraderId) -> TraderLinks;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraderInfoPayload {
    price_link: Option<String>,
    feedback_link: Option<String>,
}

pub struct TraderEnrichmentClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl TraderEnrichmentClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn info_url(&self, id: TraderId) -> String {
        format!("{}/GetTraderInfo?userId={}", self.base_url, id)
    }

    pub async fn fetch(&self, id: TraderId) -> Result<TraderLinks, RosterError> {
        let reply = self.fetcher.get_json(&self.info_url(id)).await;
        if !reply.is_ok() {
            return Err(RosterError::NetworkFailure(format!("HTTP {}", reply.status)));
        }
        let body = reply
            .body
            .ok_or_else(|| RosterError::ParseFailure("non-JSON body".to_string()))?;
        let payload: TraderInfoPayload = serde_json::from_value(body)?;
        Ok(TraderLinks::new(payload.price_link, payload.feedback_link))
    }
}

#[async_trait]
impl EnrichmentSource for TraderEnrichmentClient {
    async fn lookup(&self, id: TraderId) -> TraderLinks {
        match self.fetch(id).await {
            Ok(links) => links,
            Err(e) => {
                log::debug!(target: "enrichment", "no enrichment for trader {}: {}", id, e);
                TraderLinks::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{HttpReply, MockFetcher};
    use serde_json::json;

    const BASE: &str = "http://info.test/";

    #[tokio::test]
    async fn test_lookup_attaches_links() {
        let mock = Arc::new(MockFetcher::new());
        mock.set_json(
            "http://info.test/GetTraderInfo?userId=7",
            200,
            json!({"priceLink": "https://prices/7", "feedbackLink": ""}),
        );

        let links = TraderEnrichmentClient::new(mock, BASE).lookup(7).await;
        assert_eq!(links.price_link.as_deref(), Some("https://prices/7"));
        assert_eq!(links.feedback_link, None);
    }

    #[tokio::test]
    async fn test_non_200_is_no_enrichment() {
        let mock = Arc::new(MockFetcher::new());
        mock.set_json(
            "http://info.test/GetTraderInfo?userId=7",
            404,
            json!({"priceLink": "https://prices/7"}),
        );

        let links = TraderEnrichmentClient::new(mock, BASE).lookup(7).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_no_enrichment() {
        let mock = Arc::new(MockFetcher::new());
        mock.set_json("http://info.test/GetTraderInfo?userId=1", 200, json!({"priceLink": 12}));
        mock.set_reply("http://info.test/GetTraderInfo?userId=2", HttpReply::new(200, None));
        let client = TraderEnrichmentClient::new(mock, BASE);

        assert!(client.lookup(1).await.is_empty());
        assert!(client.lookup(2).await.is_empty());
        assert!(client.lookup(3).await.is_empty());
        assert!(matches!(client.fetch(2).await, Err(RosterError::ParseFailure(_))));
    }
}
