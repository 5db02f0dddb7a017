// Error taxonomy for the roster pipeline.
//
// Every variant is absorbed where it happens and turned into a documented
// default; none of them reach the render layer.
use std::fmt;

use crate::models::TraderId;

#[derive(Debug, Clone, PartialEq)]
pub enum RosterError {
    // Remote errors
    NetworkFailure(String),
    ParseFailure(String),
    MissingCredential,

    // Local roster errors
    NotFound(TraderId),
    Storage(String),
}

impl RosterError {
    /// Short machine-friendly tag, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::ParseFailure(_) => "parse_failure",
            Self::MissingCredential => "missing_credential",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure(msg) => write!(f, "Network failure: {}", msg),
            Self::ParseFailure(msg) => write!(f, "Parse failure: {}", msg),
            Self::MissingCredential => write!(f, "No API credential configured"),
            Self::NotFound(id) => write!(f, "Trader {} is not in the roster", id),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseFailure(err.to_string())
    }
}

impl From<sled::Error> for RosterError {
    fn from(err: sled::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(RosterError::NotFound(42).to_string(), "Trader 42 is not in the roster");
        assert_eq!(
            RosterError::NetworkFailure("HTTP 0".to_string()).to_string(),
            "Network failure: HTTP 0"
        );
        assert_eq!(RosterError::MissingCredential.kind(), "missing_credential");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<i64>("not json").unwrap_err();
        let roster_err: RosterError = err.into();
        assert!(matches!(roster_err, RosterError::ParseFailure(_)));
    }
}
