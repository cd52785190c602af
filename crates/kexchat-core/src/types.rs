//! Core newtypes shared across the client
//!
//! Newtype patterns for semantic validation and type safety.

use core::fmt;
use core::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::errors::{ChatError, ValidationError};

// ----------------------------------------------------------------------------
// Username
// ----------------------------------------------------------------------------

/// Display name chosen at login.
///
/// Non-empty after trimming and immutable for the life of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Parse a username, rejecting empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Username {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_trims_surrounding_whitespace() {
        let name = Username::parse("  alice  ").unwrap();
        assert_eq!(name.as_str(), "alice");
        assert_eq!(name.to_string(), "alice");
    }

    #[test]
    fn username_rejects_empty_input() {
        assert!(Username::parse("").is_err());
        assert!(Username::parse("   ").is_err());
        assert!(Username::parse("\t\n").is_err());
    }

    #[test]
    fn username_from_str_round_trip() {
        let name: Username = "bob".parse().unwrap();
        assert_eq!(name.as_str(), "bob");
    }

    #[test]
    fn timestamp_ordering_follows_millis() {
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(2_000);
        assert!(earlier < later);
        assert_eq!(later.as_millis(), 2_000);
    }

    #[test]
    fn timestamp_now_is_nonzero() {
        assert!(Timestamp::now().as_millis() > 0);
    }

    #[test]
    fn timestamp_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Timestamp::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: Timestamp = serde_json::from_str("42").unwrap();
        assert_eq!(back, Timestamp::new(42));
    }
}
