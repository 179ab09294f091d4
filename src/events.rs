//! In-process broadcast of store changes

use crate::core::{Comment, Status, Ticket, TicketId};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 100;

/// Change published by the ticket store after it has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    TicketCreated {
        ticket: Ticket,
    },
    TicketUpdated {
        ticket: Ticket,
    },
    StatusChanged {
        ticket_id: TicketId,
        old_status: Status,
        new_status: Status,
    },
    Assigned {
        ticket_id: TicketId,
        assignee: Option<String>,
    },
    CommentAdded {
        comment: Comment,
    },
}

/// Fan-out of store events to any number of subscribers
///
/// Publishing never blocks and never fails; with no subscribers events
/// are dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Get an event receiver
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        tracing::trace!(?event, "publishing store event");
        let _ = self.sender.send(event);
    }
}
