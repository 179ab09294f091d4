use crate::core::{Priority, Status, Ticket};
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard overview of a ticket collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    pub critical: usize,
    pub high: usize,
    /// Open tickets nobody has picked up yet
    pub awaiting_assignment: usize,
    pub comments: usize,
    pub by_service: BTreeMap<String, usize>,
}

impl TicketStats {
    #[must_use]
    pub fn collect(tickets: &[Ticket]) -> Self {
        let mut stats = Self {
            total: tickets.len(),
            ..Self::default()
        };

        for ticket in tickets {
            match ticket.status {
                Status::Open => stats.open += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
                Status::Closed => stats.closed += 1,
            }
            match ticket.priority {
                Priority::Critical => stats.critical += 1,
                Priority::High => stats.high += 1,
                _ => {},
            }
            if ticket.status == Status::Open && !ticket.is_assigned() {
                stats.awaiting_assignment += 1;
            }
            stats.comments += ticket.comments.len();
            *stats
                .by_service
                .entry(ticket.gcp_service.clone())
                .or_default() += 1;
        }

        stats
    }
}

/// Tickets grouped into one column per status, in status order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub columns: Vec<(Status, Vec<Ticket>)>,
}

impl Board {
    #[must_use]
    pub fn group(tickets: Vec<Ticket>) -> Self {
        let mut columns: Vec<(Status, Vec<Ticket>)> =
            Status::ALL.iter().map(|s| (*s, Vec::new())).collect();

        for ticket in tickets {
            if let Some((_, column)) = columns.iter_mut().find(|(s, _)| *s == ticket.status) {
                column.push(ticket);
            }
        }

        Self { columns }
    }

    #[must_use]
    pub fn column(&self, status: Status) -> &[Ticket] {
        self.columns
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(&[], |(_, tickets)| tickets.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_tickets;

    #[test]
    fn test_stats_over_sample_data() {
        let stats = TicketStats::collect(&sample_tickets().unwrap());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.closed, 1);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.awaiting_assignment, 2);
        assert_eq!(stats.comments, 8);
        assert_eq!(stats.by_service.get("BigQuery"), Some(&1));
    }

    #[test]
    fn test_board_columns() {
        let board = Board::group(sample_tickets().unwrap());
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.columns[0].0, Status::Open);
        assert_eq!(board.column(Status::Open).len(), 2);
        assert_eq!(board.column(Status::Closed)[0].id, "T-1004");
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(TicketStats::collect(&[]), TicketStats::default());
        let board = Board::group(Vec::new());
        assert!(board.columns.iter().all(|(_, c)| c.is_empty()));
    }
}
