//! The ticket store
//!
//! [`TicketStore`] keeps a view of the ticket collection and writes it back
//! through a [`TicketRepository`] after every mutation. Each operation
//! first re-reads the stored collection, so several stores (or processes)
//! sharing one backend see each other's writes; concurrent writers are not
//! coordinated and the last write wins.
//!
//! Saving is best-effort. A failed save is logged and counted (see
//! [`TicketStore::persist_failures`]) but the operation still returns its
//! result, and the in-memory view keeps the change. Until a later save
//! succeeds the store stops re-reading storage, so lookups still see the
//! change and new ids are not handed out twice; the next mutation writes
//! the whole view again.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use support_desk::core::{NewTicket, Priority, Status};
//! use support_desk::storage::{JsonRepository, MemoryBackend};
//! use support_desk::store::TicketStore;
//!
//! let repository = JsonRepository::with_default_key(Arc::new(MemoryBackend::new()));
//! let mut store = TicketStore::builder(repository).build();
//!
//! let ticket = store.create_ticket(NewTicket {
//!     title: "BigQuery query timeout".to_string(),
//!     description: "Queries time out on large datasets".to_string(),
//!     priority: Priority::High,
//!     gcp_service: "BigQuery".to_string(),
//!     created_by: "sarah@example.com".to_string(),
//!     status: Status::Open,
//! })?;
//!
//! assert_eq!(store.search("bigquery"), vec![ticket]);
//! # Ok::<(), support_desk::DeskError>(())
//! ```

mod clock;
mod filter;
mod ids;
mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use filter::{SortBy, TicketFilter, sort_tickets};
pub use ids::{
    FIRST_COMMENT_NUMBER, FIRST_TICKET_NUMBER, IdGenerator, LAST_COMMENT_NUMBER,
    LAST_TICKET_NUMBER, RandomIds, SequentialIds,
};
pub use stats::{Board, TicketStats};

use crate::core::{Comment, NewTicket, Status, Ticket, TicketUpdate};
use crate::error::{DeskError, Result};
use crate::events::{EventBus, StoreEvent};
use crate::notify::{Notification, Notifier, NullNotifier};
use crate::storage::TicketRepository;
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Author recorded on comments the store writes itself
pub const SYSTEM_AUTHOR: &str = "system";

/// Trimmed assignee, `None` when blank; anything else must look like an
/// email address
fn checked_assignee(assignee: Option<&str>) -> Result<Option<String>> {
    match assignee.map(str::trim).filter(|a| !a.is_empty()) {
        Some(email) if !email.contains('@') => Err(DeskError::InvalidInput(format!(
            "'{email}' is not an email address"
        ))),
        email => Ok(email.map(str::to_string)),
    }
}

/// Builder for [`TicketStore`]
pub struct StoreBuilder {
    repository: Box<dyn TicketRepository>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    events: EventBus,
    seed: Vec<Ticket>,
}

impl StoreBuilder {
    /// Set the id generator (defaults to [`SequentialIds`])
    #[must_use]
    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Set the clock (defaults to [`SystemClock`])
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the notifier used on ticket creation (defaults to [`NullNotifier`])
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Share an event bus with other components
    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Tickets to start from when the repository holds nothing yet
    ///
    /// Seed tickets are not written until the first mutation.
    #[must_use]
    pub fn seed(mut self, tickets: Vec<Ticket>) -> Self {
        self.seed = tickets;
        self
    }

    /// Load the stored collection and build the store
    pub fn build(self) -> TicketStore {
        let mut store = TicketStore {
            repository: self.repository,
            ids: self.ids,
            clock: self.clock,
            notifier: self.notifier,
            events: self.events,
            tickets: self.seed,
            persist_failures: 0,
            unsaved: false,
        };
        store.refresh();
        tracing::debug!(tickets = store.tickets.len(), "ticket store opened");
        store
    }
}

/// Collection of tickets and their comments
pub struct TicketStore {
    repository: Box<dyn TicketRepository>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    events: EventBus,
    tickets: Vec<Ticket>,
    persist_failures: usize,
    unsaved: bool,
}

impl std::fmt::Debug for TicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStore")
            .field("tickets", &self.tickets.len())
            .field("persist_failures", &self.persist_failures)
            .field("unsaved", &self.unsaved)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl TicketStore {
    /// Start building a store over `repository`
    pub fn builder(repository: impl TicketRepository + 'static) -> StoreBuilder {
        StoreBuilder {
            repository: Box::new(repository),
            ids: Arc::new(SequentialIds),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(NullNotifier),
            events: EventBus::new(),
            seed: Vec::new(),
        }
    }

    /// Receive events for every change this store applies
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Number of saves that failed since the store was opened
    #[must_use]
    pub const fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    /// Whether the last save failed and the view holds changes storage
    /// does not have
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// All tickets in storage order, newest created first
    pub fn all_tickets(&mut self) -> Vec<Ticket> {
        self.refresh();
        self.tickets.clone()
    }

    /// Ticket with the given id, if any
    pub fn ticket(&mut self, id: &str) -> Option<Ticket> {
        self.refresh();
        self.tickets.iter().find(|t| t.id == id).cloned()
    }

    /// Open a new ticket
    ///
    /// The ticket is prepended to the collection and saved, then a
    /// notification is sent.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::IdsExhausted`] if every ticket number is taken
    pub fn create_ticket(&mut self, new: NewTicket) -> Result<Ticket> {
        self.refresh();
        let now = self.clock.now();

        let ticket = Ticket {
            id: self.ids.ticket_id(&self.tickets)?,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            gcp_service: new.gcp_service,
            created_by: new.created_by,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        };

        self.tickets.insert(0, ticket.clone());
        self.persist();

        tracing::info!(
            id = %ticket.id,
            priority = %ticket.priority,
            service = %ticket.gcp_service,
            "ticket created"
        );
        self.notifier.notify(&Notification::new(
            "New ticket created",
            format!("{}: {}", ticket.id, ticket.title),
        ));
        self.events.publish(StoreEvent::TicketCreated {
            ticket: ticket.clone(),
        });

        Ok(ticket)
    }

    /// Merge `update` into a ticket and refresh its `updated_at`
    ///
    /// A new assignee must be an email address, as with
    /// [`assign`](Self::assign); a blank one clears the assignee. Unlike
    /// `assign`, the status is left alone and no comment is added.
    pub fn update_ticket(&mut self, id: &str, mut update: TicketUpdate) -> Result<Ticket> {
        if let Some(assignee) = update.assigned_to.take() {
            update.assigned_to = Some(checked_assignee(assignee.as_deref())?);
        }

        let (old_status, ticket) = self.mutate(id, |ticket, now| {
            let old_status = ticket.status;
            update.apply_to(ticket);
            ticket.touch(now);
            Ok(old_status)
        })?;

        tracing::info!(id = %ticket.id, "ticket updated");
        if old_status != ticket.status {
            self.events.publish(StoreEvent::StatusChanged {
                ticket_id: ticket.id.clone(),
                old_status,
                new_status: ticket.status,
            });
        }
        self.events.publish(StoreEvent::TicketUpdated {
            ticket: ticket.clone(),
        });
        Ok(ticket)
    }

    /// Set a ticket's status
    ///
    /// Any status may follow any other. Setting the current status again
    /// changes nothing, including `updated_at`.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<Ticket> {
        let current = self
            .ticket(id)
            .ok_or_else(|| DeskError::ticket_not_found(id))?;
        if current.status == status {
            return Ok(current);
        }
        self.update_ticket(id, TicketUpdate::status(status))
    }

    /// Assign a ticket, or clear its assignee with `None`
    ///
    /// Assigning moves the ticket to in-progress and records a system
    /// comment. Clearing keeps the status and adds no comment.
    pub fn assign(&mut self, id: &str, assignee: Option<&str>) -> Result<Ticket> {
        let assignee = checked_assignee(assignee)?;

        let ids = Arc::clone(&self.ids);
        let ((old_status, comment), ticket) = self.mutate(id, |ticket, now| {
            let comment = assignee
                .as_deref()
                .map(|email| {
                    Ok::<_, DeskError>(Comment {
                        id: ids.comment_id(ticket)?,
                        ticket_id: ticket.id.clone(),
                        content: format!("Ticket assigned to {email}"),
                        author: SYSTEM_AUTHOR.to_string(),
                        created_at: now,
                    })
                })
                .transpose()?;

            let old_status = ticket.status;
            ticket.assigned_to = assignee;
            ticket.touch(now);
            if let Some(comment) = &comment {
                ticket.status = Status::InProgress;
                ticket.comments.push(comment.clone());
            }
            Ok((old_status, comment))
        })?;

        tracing::info!(id = %ticket.id, assignee = ?ticket.assigned_to, "ticket assignment changed");
        self.events.publish(StoreEvent::Assigned {
            ticket_id: ticket.id.clone(),
            assignee: ticket.assigned_to.clone(),
        });
        if old_status != ticket.status {
            self.events.publish(StoreEvent::StatusChanged {
                ticket_id: ticket.id.clone(),
                old_status,
                new_status: ticket.status,
            });
        }
        if let Some(comment) = comment {
            self.events.publish(StoreEvent::CommentAdded { comment });
        }
        Ok(ticket)
    }

    /// Append a comment to a ticket's thread
    ///
    /// Comment ids are numbered within the ticket.
    pub fn add_comment(&mut self, ticket_id: &str, content: &str, author: &str) -> Result<Comment> {
        let ids = Arc::clone(&self.ids);
        let (comment, _) = self.mutate(ticket_id, |ticket, now| {
            let comment = Comment {
                id: ids.comment_id(ticket)?,
                ticket_id: ticket.id.clone(),
                content: content.to_string(),
                author: author.to_string(),
                created_at: now,
            };
            ticket.comments.push(comment.clone());
            ticket.touch(now);
            Ok(comment)
        })?;

        tracing::info!(ticket = %comment.ticket_id, comment = %comment.id, "comment added");
        self.events.publish(StoreEvent::CommentAdded {
            comment: comment.clone(),
        });
        Ok(comment)
    }

    /// Case-insensitive substring search over title, description, service
    /// and id
    pub fn search(&mut self, query: &str) -> Vec<Ticket> {
        self.search_text(query, false)
    }

    /// Like [`search`](Self::search), also matching the reporter's address
    pub fn search_with_creator(&mut self, query: &str) -> Vec<Ticket> {
        self.search_text(query, true)
    }

    /// Case-insensitive regular-expression search over the same fields as
    /// [`search`](Self::search)
    pub fn search_regex(&mut self, pattern: &str) -> Result<Vec<Ticket>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DeskError::InvalidInput(format!("Invalid search pattern: {e}")))?;

        self.refresh();
        Ok(self
            .tickets
            .iter()
            .filter(|t| {
                regex.is_match(&t.title)
                    || regex.is_match(&t.description)
                    || regex.is_match(&t.gcp_service)
                    || regex.is_match(t.id.as_str())
            })
            .cloned()
            .collect())
    }

    /// Tickets matching every non-empty dimension of `filter`
    pub fn filter(&mut self, filter: &TicketFilter) -> Vec<Ticket> {
        self.refresh();
        self.tickets
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Dashboard counts over the whole collection
    pub fn stats(&mut self) -> TicketStats {
        self.refresh();
        TicketStats::collect(&self.tickets)
    }

    /// Tickets grouped by status
    pub fn board(&mut self) -> Board {
        Board::group(self.all_tickets())
    }

    fn search_text(&mut self, query: &str, include_creator: bool) -> Vec<Ticket> {
        let needle = query.to_lowercase();
        self.refresh();
        self.tickets
            .iter()
            .filter(|t| t.matches_text(&needle, include_creator))
            .cloned()
            .collect()
    }

    /// Reload the stored collection; on failure keep the current view
    ///
    /// While a save is pending the view is newer than storage and is kept.
    fn refresh(&mut self) {
        if self.unsaved {
            tracing::debug!("unsaved changes pending, keeping in-memory view");
            return;
        }

        match self.repository.load_all() {
            Ok(Some(tickets)) => self.tickets = tickets,
            Ok(None) => {},
            Err(e) => {
                tracing::warn!(error = %e, "failed to load tickets, keeping in-memory view");
            },
        }
    }

    /// Write the whole collection back; failures are logged and counted
    fn persist(&mut self) {
        match self.repository.save_all(&self.tickets) {
            Ok(()) => {
                if self.unsaved {
                    tracing::info!("pending changes saved");
                }
                self.unsaved = false;
            },
            Err(e) => {
                self.persist_failures += 1;
                self.unsaved = true;
                tracing::error!(error = %e, "failed to persist tickets");
            },
        }
    }

    /// Re-read, apply `f` to the ticket with `id`, and save
    ///
    /// `f` must leave the ticket untouched when it fails; nothing is saved
    /// then.
    fn mutate<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Ticket, DateTime<Utc>) -> Result<T>,
    ) -> Result<(T, Ticket)> {
        self.refresh();
        let now = self.clock.now();

        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DeskError::ticket_not_found(id))?;
        let output = f(ticket, now)?;
        let updated = ticket.clone();

        self.persist();
        Ok((output, updated))
    }
}
