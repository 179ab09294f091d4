//! support-desk - A support ticket store for cloud platform requests
//!
//! This crate provides the data layer of a support-ticketing desk:
//! - Tickets with status, priority and a service label, plus a comment thread
//! - A store with create/update/comment/search/filter operations
//! - Whole-collection JSON persistence behind a key/value storage backend
//! - Injectable id generation, clock and creation notifications
//! - A command-line front end (`support-desk`)

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]

//! # Persistence
//!
//! The collection is stored as one JSON array under a single key. Every
//! store operation re-reads that key, and every mutation rewrites it.
//! Writers are not coordinated: two stores sharing a backend simply see
//! each other's last write.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use support_desk::core::sample_tickets;
//! use support_desk::storage::{JsonRepository, MemoryBackend};
//! use support_desk::store::{TicketFilter, TicketStore};
//! use support_desk::core::Status;
//!
//! let repository = JsonRepository::with_default_key(Arc::new(MemoryBackend::new()));
//! let mut store = TicketStore::builder(repository)
//!     .seed(sample_tickets()?)
//!     .build();
//!
//! let open = store.filter(&TicketFilter::new().status(Status::Open));
//! assert_eq!(open.len(), 2);
//! # Ok::<(), support_desk::DeskError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod export;
pub mod notify;
pub mod storage;
pub mod store;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{DeskError, Result};
pub use store::TicketStore;
