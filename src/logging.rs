/// Structured log events
///
/// Builds one-line JSON payloads for the `log` facade, so build summaries can
/// be grepped and parsed out of the log4rs output.

use serde_json::{json, Value};

/// Get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Structured log event builder
///
/// Usage:
/// ```
/// use trader_roster::logging::LogEvent;
///
/// let event = LogEvent::new("SNAPSHOT_BUILT")
///     .field("roster_size", 4)
///     .field("online_count", 2)
///     .build();
///
/// log::info!(target: "roster", "{}", event);
/// ```
pub struct LogEvent {
    fields: serde_json::Map<String, Value>,
}

impl LogEvent {
    /// Create a new log event with the given event name
    pub fn new(event: &str) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("event".to_string(), json!(event));
        fields.insert("timestamp_ms".to_string(), json!(now_ms()));

        Self { fields }
    }

    /// Add a field to the log event
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Build the final JSON value
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_builder() {
        let log = LogEvent::new("SNAPSHOT_BUILT")
            .field("roster_size", 3usize)
            .field("sponsored_failed", false)
            .build();

        assert_eq!(log["event"], "SNAPSHOT_BUILT");
        assert_eq!(log["roster_size"], 3);
        assert_eq!(log["sponsored_failed"], false);
        assert!(log["timestamp_ms"].as_i64().unwrap() > 0);
    }
}
