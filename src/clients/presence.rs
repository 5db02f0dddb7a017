use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::RosterError;
use crate::models::{PresenceInfo, PresenceStatus, TraderId};
use crate::net::JsonFetcher;

/// Resolves a trader's live status.
///
/// Implementations never fail: anything that goes wrong is reported as
/// `PresenceInfo::unknown()`.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    async fn resolve(&self, id: TraderId) -> PresenceInfo;
}

/// Supplies the opaque API credential, read on every lookup
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<String>;
}

/// Credential fixed at construction, e.g. one injected by the embedding host
pub struct FixedCredential(Option<String>);

impl FixedCredential {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.trim().is_empty()))
    }
}

impl CredentialSource for FixedCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    last_action: Option<LastAction>,
}

#[derive(Debug, Deserialize)]
struct LastAction {
    status: Option<String>,
    relative: Option<String>,
}

pub struct PresenceClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl PresenceClient {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        base_url: &str,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn user_url(&self, id: TraderId, key: &str) -> String {
        format!("{}/user/{}?key={}", self.base_url, id, key)
    }

    /// Single lookup, no retry
    pub async fn fetch(&self, id: TraderId) -> Result<PresenceInfo, RosterError> {
        let key = self.credentials.credential().ok_or(RosterError::MissingCredential)?;

        let reply = self.fetcher.get_json(&self.user_url(id, &key)).await;
        if reply.is_transport_failure() {
            return Err(RosterError::NetworkFailure("no response".to_string()));
        }
        let body = reply
            .body
            .ok_or_else(|| RosterError::ParseFailure(format!("HTTP {} with non-JSON body", reply.status)))?;
        let profile: UserProfile = serde_json::from_value(body)?;

        let (status, relative) = match profile.last_action {
            Some(action) => (action.status, action.relative),
            None => (None, None),
        };
        Ok(PresenceInfo::new(
            status.as_deref().map_or(PresenceStatus::Unknown, PresenceStatus::from_wire),
            relative.unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl PresenceSource for PresenceClient {
    async fn resolve(&self, id: TraderId) -> PresenceInfo {
        match self.fetch(id).await {
            Ok(presence) => presence,
            Err(RosterError::MissingCredential) => {
                log::debug!(target: "presence", "no credential, trader {} is Unknown", id);
                PresenceInfo::unknown()
            }
            Err(e) => {
                log::warn!(target: "presence", "presence for trader {} unavailable ({}): {}", id, e.kind(), e);
                PresenceInfo::unknown()
            }
        }
    }
}
