//! Test utilities for support-desk
//!
//! This module provides common test fixtures and utilities to reduce
//! duplication in test code across the codebase.

#![cfg(test)]

use crate::core::{NewTicket, Priority, Ticket, sample_tickets};
use crate::storage::{FileBackend, JsonRepository, StorageBackend, TicketRepository};
use crate::store::{ManualClock, SequentialIds, TicketStore};
use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test fixture for a file-backed desk in a temporary directory
///
/// Every call to [`store`](Self::store) opens a fresh store over the same
/// files, the way two CLI invocations would.
pub struct TestDesk {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub backend: Arc<FileBackend>,
    pub clock: Arc<ManualClock>,
}

impl TestDesk {
    /// Create an empty desk
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        let backend = Arc::new(FileBackend::new(&data_dir));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap(),
        ));

        Self {
            temp_dir,
            data_dir,
            backend,
            clock,
        }
    }

    /// Create a desk holding the five example tickets
    pub fn with_samples() -> Self {
        let desk = Self::new();
        desk.repository()
            .save_all(&sample_tickets().expect("Failed to load sample tickets"))
            .expect("Failed to save sample tickets");
        desk
    }

    pub fn repository(&self) -> JsonRepository {
        let backend: Arc<dyn StorageBackend> = self.backend.clone();
        JsonRepository::with_default_key(backend)
    }

    /// Open a store with sequential ids and the manual clock
    pub fn store(&self) -> TicketStore {
        TicketStore::builder(self.repository())
            .ids(Arc::new(SequentialIds))
            .clock(self.clock.clone())
            .build()
    }

    /// Tickets as currently written to disk
    pub fn stored_tickets(&self) -> Vec<Ticket> {
        self.repository()
            .load_all()
            .expect("Failed to read tickets")
            .unwrap_or_default()
    }
}

impl Default for TestDesk {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields for a test ticket
pub fn new_ticket(title: &str, priority: Priority, service: &str) -> NewTicket {
    NewTicket {
        title: title.to_string(),
        description: format!("Description for {title}"),
        priority,
        gcp_service: service.to_string(),
        created_by: "reporter@example.com".to_string(),
        status: Default::default(),
    }
}

/// Open a ticket through `store`
pub fn create_test_ticket(store: &mut TicketStore, title: &str, priority: Priority) -> Ticket {
    store
        .create_ticket(new_ticket(title, priority, "Compute Engine"))
        .expect("Failed to create test ticket")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_shares_files_between_stores() {
        let desk = TestDesk::new();
        let created = create_test_ticket(&mut desk.store(), "Disk full", Priority::High);

        assert_eq!(created.id, "T-1001");
        assert_eq!(desk.store().ticket("T-1001").unwrap().title, "Disk full");
        assert_eq!(desk.stored_tickets().len(), 1);
    }

    #[test]
    fn test_desk_with_samples() {
        let desk = TestDesk::with_samples();
        assert_eq!(desk.store().all_tickets().len(), 5);
        assert!(desk.data_dir.join("gcp-support-tickets.json").exists());
    }
}
