use super::Ticket;
use crate::error::{DeskError, Result};

const SAMPLE_TICKETS: &str = include_str!("sample_tickets.json");

/// The example tickets used to seed an empty store
pub fn sample_tickets() -> Result<Vec<Ticket>> {
    serde_json::from_str(SAMPLE_TICKETS)
        .map_err(|e| DeskError::ParseError(format!("Invalid sample data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Priority, Status};

    #[test]
    fn test_sample_tickets_parse() {
        let tickets = sample_tickets().unwrap();
        assert_eq!(tickets.len(), 5);
        assert_eq!(tickets[0].id, "T-1001");
        assert_eq!(tickets[0].status, Status::InProgress);
        assert_eq!(tickets[0].priority, Priority::Critical);
        assert_eq!(tickets[2].comments.len(), 4);
    }

    #[test]
    fn test_sample_comments_point_at_their_ticket() {
        for ticket in sample_tickets().unwrap() {
            assert!(ticket.updated_at >= ticket.created_at);
            for comment in &ticket.comments {
                assert_eq!(comment.ticket_id, ticket.id);
            }
        }
    }
}
