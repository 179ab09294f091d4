use crate::error::{DeskError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static TICKET_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T-(\d{4,})$").expect("valid ticket id pattern"));
static COMMENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^C-(\d{3,})$").expect("valid comment id pattern"));

/// Identifier of a ticket, rendered as `T-####`
///
/// Deserialization does not check the format: stored payloads are trusted
/// as-is. Use [`TicketId::from_str`] for user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Build an id from its numeric suffix, zero-padded to four digits
    #[must_use]
    pub fn from_number(number: u32) -> Self {
        Self(format!("T-{number:04}"))
    }

    /// Numeric suffix, if the id is well formed
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        TICKET_ID
            .captures(&self.0)
            .and_then(|c| c[1].parse().ok())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TicketId {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        if TICKET_ID.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(DeskError::InvalidInput(format!(
                "'{s}' is not a ticket id (expected T-####)"
            )))
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TicketId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TicketId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identifier of a comment, rendered as `C-###`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Build an id from its numeric suffix, zero-padded to three digits
    #[must_use]
    pub fn from_number(number: u32) -> Self {
        Self(format!("C-{number:03}"))
    }

    #[must_use]
    pub fn number(&self) -> Option<u32> {
        COMMENT_ID
            .captures(&self.0)
            .and_then(|c| c[1].parse().ok())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for CommentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
