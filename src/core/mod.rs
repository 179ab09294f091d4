//! Core data model: tickets, comments and their identifiers

mod builders;
mod catalog;
mod ids;
mod sample;
mod ticket;

pub use builders::{CommentBuilder, TicketBuilder};
pub use catalog::{GCP_SERVICES, is_known_service};
pub use ids::{CommentId, TicketId};
pub use sample::sample_tickets;
pub use ticket::{Comment, NewTicket, Priority, Status, Ticket, TicketUpdate};
