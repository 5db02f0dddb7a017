use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::CredentialSource;
use crate::error::RosterError;
use crate::models::{TraderEntry, TraderId};
use crate::simple_kv_storage::KeyValueStore;

pub const ROSTER_KEY: &str = "my_traders_list";
pub const CREDENTIAL_KEY: &str = "torn_api_key";

/// Result of a profile-page toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
}

/// The user's own roster of tracked traders.
///
/// Assumes a single writer: each mutation reads the whole list, edits it and
/// writes it back before returning.
pub struct PersistedRosterStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PersistedRosterStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Point-in-time copy of the roster, in insertion order
    pub fn list(&self) -> Vec<TraderEntry> {
        let raw = self.kv.get(ROSTER_KEY, json!([]));
        match serde_json::from_value::<Vec<TraderEntry>>(raw) {
            Ok(list) => list,
            Err(e) => {
                log::warn!(target: "roster_store", "stored roster is malformed, reading as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: TraderId) -> bool {
        self.list().iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: TraderId) -> Result<TraderEntry, RosterError> {
        self.list()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(RosterError::NotFound(id))
    }

    /// Appends `{id, name}`; returns false without writing if `id` is present
    pub fn add(&self, id: TraderId, name: Option<&str>) -> Result<bool, RosterError> {
        let mut list = self.list();
        if list.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        let entry = TraderEntry::new(id, name);
        log::info!(target: "roster_store", "adding trader {} ({})", entry.id, entry.name);
        list.push(entry);
        self.save(&list)?;
        Ok(true)
    }

    /// Deletes the entry for `id`; returns false without writing if absent
    pub fn remove(&self, id: TraderId) -> Result<bool, RosterError> {
        let mut list = self.list();
        let before = list.len();
        list.retain(|t| t.id != id);
        if list.len() == before {
            log::debug!(target: "roster_store", "remove skipped: {}", RosterError::NotFound(id));
            return Ok(false);
        }
        log::info!(target: "roster_store", "removing trader {}", id);
        self.save(&list)?;
        Ok(true)
    }

    /// Removes `id` if tracked, adds it otherwise
    pub fn toggle(&self, id: TraderId, name: Option<&str>) -> Result<ToggleAction, RosterError> {
        if self.remove(id)? {
            Ok(ToggleAction::Removed)
        } else {
            self.add(id, name)?;
            Ok(ToggleAction::Added)
        }
    }

    /// Stored credential; blank values count as absent
    pub fn credential(&self) -> Option<String> {
        match self.kv.get(CREDENTIAL_KEY, Value::Null) {
            Value::String(key) if !key.trim().is_empty() => Some(key),
            _ => None,
        }
    }

    pub fn set_credential(&self, key: &str) -> Result<(), RosterError> {
        self.kv.set(CREDENTIAL_KEY, Value::String(key.trim().to_string()))
    }

    fn save(&self, list: &[TraderEntry]) -> Result<(), RosterError> {
        self.kv.set(ROSTER_KEY, serde_json::to_value(list)?)
    }
}

impl CredentialSource for PersistedRosterStore {
    fn credential(&self) -> Option<String> {
        PersistedRosterStore::credential(self)
    }
}
