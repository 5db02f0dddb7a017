//! Mock fetcher for testing
//!
//! Replies are scripted per URL; unscripted URLs behave like an
//! unreachable host.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::fetcher::{HttpReply, JsonFetcher};

#[derive(Default)]
pub struct MockFetcher {
    /// Map of url -> scripted reply
    replies: Mutex<HashMap<String, HttpReply>>,
    /// Every url requested, in order
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reply(&self, url: &str, reply: HttpReply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    /// Shorthand for a JSON reply
    pub fn set_json(&self, url: &str, status: u16, body: Value) {
        self.set_reply(url, HttpReply::json(status, body));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn get_json(&self, url: &str) -> HttpReply {
        log::debug!(target: "http", "mock GET {}", url);
        self.calls.lock().unwrap().push(url.to_string());
        self.replies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(HttpReply::failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_default_is_failure() {
        let mock = MockFetcher::new();
        assert_eq!(mock.get_json("http://x/unknown").await, HttpReply::failed());
        assert_eq!(mock.calls(), vec!["http://x/unknown".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_scripted_reply() {
        let mock = MockFetcher::new();
        mock.set_json("http://x/a", 200, json!({"ok": true}));

        let reply = mock.get_json("http://x/a").await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, Some(json!({"ok": true})));
        assert_eq!(mock.call_count(), 1);
    }
}
