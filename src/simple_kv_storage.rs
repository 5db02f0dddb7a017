use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use serde_json::Value;
use sled::Db;

use crate::error::RosterError;

/// Key-value persistence the roster store is written against.
///
/// Values are JSON so the stored roster keeps the `[{id, name}]` shape.
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, or `default` when absent or unreadable
    fn get(&self, key: &str, default: Value) -> Value;

    /// Persists `value`; returns once the write is durable
    fn set(&self, key: &str, value: Value) -> Result<(), RosterError>;
}

pub struct SledDb {
    db: Db,
}

impl SledDb {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, sled::Error> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    fn flush(&self) -> sled::Result<usize> {
        self.db.flush()
    }
}

impl KeyValueStore for SledDb {
    fn get(&self, key: &str, default: Value) -> Value {
        match self.db.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!(target: "storage", "stored value for {} is not JSON: {}", key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::warn!(target: "storage", "read of {} failed: {}", key, e);
                default
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), RosterError> {
        let bytes = serde_json::to_vec(&value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        self.flush()?;
        Ok(())
    }
}

/// Non-durable store for tests and embedded hosts without disk access
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
            .unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), RosterError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }
}
