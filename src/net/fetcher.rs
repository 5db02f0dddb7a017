use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Status code plus parsed JSON body, if the body was JSON at all
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl HttpReply {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, Some(body))
    }

    /// Transport-level failure: no response was received
    pub fn failed() -> Self {
        Self::new(0, None)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }
}

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> HttpReply;
}

/// reqwest-backed fetcher with a per-request timeout
pub struct ReqwestFetcher {
    client: Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> HttpReply {
        let response = match self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!(target: "http", "GET failed: {}", e.without_url());
                return HttpReply::failed();
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => serde_json::from_str(&text).ok(),
            Err(e) => {
                log::debug!(target: "http", "reading body failed: {}", e.without_url());
                None
            }
        };

        HttpReply::new(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_helpers() {
        assert!(HttpReply::failed().is_transport_failure());
        assert!(!HttpReply::failed().is_ok());
        assert!(HttpReply::json(200, json!({})).is_ok());
        assert!(!HttpReply::new(404, None).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_status_zero() {
        let fetcher = ReqwestFetcher::new(Duration::from_millis(500)).unwrap();
        let reply = fetcher.get_json("http://127.0.0.1:9/unreachable").await;
        assert_eq!(reply, HttpReply::failed());
    }
}
