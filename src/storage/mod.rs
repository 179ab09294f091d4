//! Persistence for the ticket collection
//!
//! A [`StorageBackend`] is a string key/value store with the same contract
//! as browser local storage. A [`TicketRepository`] keeps the whole ticket
//! collection as one JSON array under a single key of a backend.

mod backend;
mod repository;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use repository::{DEFAULT_STORAGE_KEY, JsonRepository, TicketRepository};
