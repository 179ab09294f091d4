use super::StorageBackend;
use crate::core::Ticket;
use crate::error::{DeskError, Result};
use std::sync::Arc;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "gcp-support-tickets";

/// Repository trait for the ticket collection
///
/// The collection is loaded and saved as a whole; there are no partial
/// updates.
pub trait TicketRepository: Send + Sync {
    /// Loads the stored collection, or `None` if nothing has been stored yet
    fn load_all(&self) -> Result<Option<Vec<Ticket>>>;

    /// Replaces the stored collection
    fn save_all(&self, tickets: &[Ticket]) -> Result<()>;

    /// Removes the stored collection
    fn clear(&self) -> Result<()>;
}

/// Repository keeping the collection as a JSON array under one key
#[derive(Clone)]
pub struct JsonRepository {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl std::fmt::Debug for JsonRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRepository")
            .field("backend", &"Arc<dyn StorageBackend>")
            .field("key", &self.key)
            .finish()
    }
}

impl JsonRepository {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Repository under [`DEFAULT_STORAGE_KEY`]
    pub fn with_default_key(backend: Arc<dyn StorageBackend>) -> Self {
        Self::new(backend, DEFAULT_STORAGE_KEY)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TicketRepository for JsonRepository {
    fn load_all(&self) -> Result<Option<Vec<Ticket>>> {
        let Some(raw) = self.backend.get_item(&self.key)? else {
            return Ok(None);
        };

        let tickets = serde_json::from_str(&raw).map_err(|e| {
            DeskError::ParseError(format!("Stored tickets under '{}': {e}", self.key))
        })?;
        Ok(Some(tickets))
    }

    fn save_all(&self, tickets: &[Ticket]) -> Result<()> {
        let raw = serde_json::to_string(tickets).map_err(|e| {
            DeskError::SerializationError(format!("Failed to serialize tickets: {e}"))
        })?;
        self.backend.set_item(&self.key, &raw)
    }

    fn clear(&self) -> Result<()> {
        self.backend.remove_item(&self.key)
    }
}
