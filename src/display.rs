//! Display helpers shared by both render targets.
//!
//! Element construction lives with the targets; these are the texts and
//! links they need from the roster core.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::TraderId;

pub const NO_ACTIVE_TRADERS: &str = "No active traders";
pub const NO_SPONSORED_TRADERS: &str = "No sponsored traders";
pub const SPONSORED_LOAD_ERROR: &str = "Error loading sponsored traders";

const PLATFORM_BASE_URL: &str = "https://www.torn.com";

pub fn profile_url(id: TraderId) -> String {
    format!("{}/profiles.php?XID={}", PLATFORM_BASE_URL, id)
}

pub fn trade_url(id: TraderId) -> String {
    format!("{}/trade.php#step=start&userID={}", PLATFORM_BASE_URL, id)
}

pub fn added_message(name: &str) -> String {
    format!("{} has been added to your trader list.", name)
}

pub const REMOVED_MESSAGE: &str = "Trader removed from your list.";

fn possessive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)'s\s*Profile").expect("possessive pattern is valid"))
}

fn id_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*\[\d+\]$").expect("id suffix pattern is valid"))
}

/// Turns a profile heading such as `Bob's Profile [123]` into `Bob`
pub fn clean_profile_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let without_possessive = possessive_pattern().replace(trimmed, "");
    let without_possessive = without_possessive.trim();
    let name = id_suffix_pattern().replace(without_possessive, "");
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links() {
        assert_eq!(profile_url(123), "https://www.torn.com/profiles.php?XID=123");
        assert_eq!(trade_url(123), "https://www.torn.com/trade.php#step=start&userID=123");
    }

    #[test]
    fn test_clean_profile_name() {
        assert_eq!(clean_profile_name("Bob's Profile [123]").as_deref(), Some("Bob"));
        assert_eq!(clean_profile_name("  Alice's profile ").as_deref(), Some("Alice"));
        assert_eq!(clean_profile_name("Carol [42]").as_deref(), Some("Carol"));
        assert_eq!(clean_profile_name("Dave"), Some("Dave".to_string()));
        assert_eq!(clean_profile_name("   "), None);
        assert_eq!(clean_profile_name("'s Profile"), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(added_message("Bob"), "Bob has been added to your trader list.");
    }
}
