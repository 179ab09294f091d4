//! Error types for support-desk
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! is [`DeskError`]. Lookups that may legitimately miss return `Option`
//! instead; mutations against an unknown ticket return
//! [`DeskError::TicketNotFound`].

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

/// Errors produced by the ticket store, its storage and the CLI
#[derive(Debug, Error)]
pub enum DeskError {
    /// No ticket with the given id exists
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    /// User-supplied input could not be accepted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored or imported content could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A value could not be serialized for storage or export
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The storage backend refused a write because it is full
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Every id in the fixed-width range is already taken
    #[error("No free {0} ids left")]
    IdsExhausted(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Interactive prompt failure
    #[error("Prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),

    /// Anything else
    #[error("{0}")]
    Custom(String),
}

impl DeskError {
    /// Create a custom error from any message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a not-found error for a ticket id
    pub fn ticket_not_found(id: impl Into<String>) -> Self {
        Self::TicketNotFound { id: id.into() }
    }

    /// Message shown to CLI users
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TicketNotFound { id } => format!("No ticket with id '{id}'"),
            Self::QuotaExceeded { .. } => {
                "The ticket store is full and the last change was not saved".to_string()
            },
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TicketNotFound { .. } => vec![
                "Run 'support-desk list' to see existing ticket ids".to_string(),
                "Ticket ids look like T-1001".to_string(),
            ],
            Self::InvalidInput(_) => {
                vec!["Run the command with --help to see accepted values".to_string()]
            },
            Self::Config(_) => vec![
                "Check the configuration file shown by 'support-desk config path'".to_string(),
                "Environment overrides use the SUPPORT_DESK__ prefix".to_string(),
            ],
            Self::QuotaExceeded { .. } | Self::IdsExhausted(_) => {
                vec!["Export and archive old tickets to free space".to_string()]
            },
            _ => Vec::new(),
        }
    }

    /// Whether retrying with different input can succeed
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TicketNotFound { .. } | Self::InvalidInput(_) | Self::Dialog(_)
        )
    }

    /// Whether the error comes from configuration
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_suggestions() {
        let err = DeskError::ticket_not_found("T-9999");
        assert_eq!(err.to_string(), "Ticket not found: T-9999");
        assert_eq!(err.user_message(), "No ticket with id 'T-9999'");
        assert!(!err.suggestions().is_empty());
        assert!(err.is_recoverable());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_io_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::other("disk gone"))?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, DeskError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_ids_exhausted_message() {
        let err = DeskError::IdsExhausted("ticket".to_string());
        assert_eq!(err.to_string(), "No free ticket ids left");
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_quota_message() {
        let err = DeskError::QuotaExceeded {
            needed: 10,
            limit: 5,
        };
        assert!(err.to_string().contains("10 bytes needed"));
        assert!(err.user_message().contains("not saved"));
    }
}
