use crate::core::{Priority, Status, Ticket};
use crate::error::{DeskError, Result};
use std::str::FromStr;

/// Conjunctive ticket filter
///
/// Each dimension is a set of accepted values; an empty set accepts
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
    pub services: Vec<String>,
}

impl TicketFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.statuses.push(status);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priorities.push(priority);
        self
    }

    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.services.push(service.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.priorities.is_empty() && self.services.is_empty()
    }

    /// Check if a ticket matches all filter criteria
    ///
    /// Service labels compare exactly, as stored.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&ticket.status) {
            return false;
        }

        if !self.priorities.is_empty() && !self.priorities.contains(&ticket.priority) {
            return false;
        }

        if !self.services.is_empty() && !self.services.iter().any(|s| *s == ticket.gcp_service) {
            return false;
        }

        true
    }

    /// Keep matching tickets, preserving order
    #[must_use]
    pub fn apply(&self, tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.into_iter().filter(|t| self.matches(t)).collect()
    }

    /// Build a filter from comma-separated CLI values
    pub fn from_lists(
        statuses: Option<&str>,
        priorities: Option<&str>,
        services: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            statuses: parse_list(statuses)?,
            priorities: parse_list(priorities)?,
            services: split_list(services),
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>>
where
    T: FromStr<Err = DeskError>,
{
    split_list(raw).iter().map(|s| s.parse()).collect()
}

/// Sort options for ticket listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Keep storage order (newest created first)
    #[default]
    Stored,
    Created,
    Updated,
    Priority,
    Status,
    Title,
}

impl FromStr for SortBy {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stored" | "default" => Ok(Self::Stored),
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "title" => Ok(Self::Title),
            _ => Err(DeskError::InvalidInput(format!(
                "Invalid sort key: {s}. Must be one of: stored, created, updated, priority, status, title"
            ))),
        }
    }
}

/// Sort tickets; the sort is stable so ties keep storage order
pub fn sort_tickets(tickets: &mut [Ticket], sort_by: SortBy, reverse: bool) {
    tickets.sort_by(|a, b| {
        let ordering = match sort_by {
            SortBy::Stored => std::cmp::Ordering::Equal,
            SortBy::Created => a.created_at.cmp(&b.created_at),
            SortBy::Updated => a.updated_at.cmp(&b.updated_at),
            SortBy::Priority => b.priority.cmp(&a.priority), // Higher priority first
            SortBy::Status => a.status.cmp(&b.status),
            SortBy::Title => a.title.cmp(&b.title),
        };

        if reverse { ordering.reverse() } else { ordering }
    });

    if reverse && sort_by == SortBy::Stored {
        tickets.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_tickets;

    fn ids(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything_in_order() {
        let tickets = sample_tickets().unwrap();
        let filtered = TicketFilter::new().apply(tickets.clone());
        assert_eq!(filtered, tickets);
    }

    #[test]
    fn test_single_dimension() {
        let tickets = sample_tickets().unwrap();
        let filtered = TicketFilter::new().status(Status::Open).apply(tickets);
        assert_eq!(ids(&filtered), vec!["T-1002", "T-1005"]);
    }

    #[test]
    fn test_dimensions_are_conjunctive() {
        let tickets = sample_tickets().unwrap();
        let filtered = TicketFilter::new()
            .status(Status::Open)
            .status(Status::InProgress)
            .priority(Priority::High)
            .apply(tickets);
        assert_eq!(ids(&filtered), vec!["T-1002", "T-1005"]);

        let tickets = sample_tickets().unwrap();
        let filtered = TicketFilter::new()
            .priority(Priority::High)
            .service("BigQuery")
            .apply(tickets);
        assert_eq!(ids(&filtered), vec!["T-1002"]);
    }

    #[test]
    fn test_from_lists() {
        let filter =
            TicketFilter::from_lists(Some("open, in-progress"), Some("critical"), Some("Cloud Run,"))
                .unwrap();
        assert_eq!(filter.statuses, vec![Status::Open, Status::InProgress]);
        assert_eq!(filter.priorities, vec![Priority::Critical]);
        assert_eq!(filter.services, vec!["Cloud Run".to_string()]);

        assert!(TicketFilter::from_lists(Some("pending"), None, None).is_err());
        assert!(TicketFilter::from_lists(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_priority() {
        let mut tickets = sample_tickets().unwrap();
        sort_tickets(&mut tickets, SortBy::Priority, false);
        assert_eq!(tickets[0].id, "T-1001");
        assert_eq!(tickets[4].id, "T-1004");
    }

    #[test]
    fn test_sort_stored_reverse() {
        let mut tickets = sample_tickets().unwrap();
        sort_tickets(&mut tickets, SortBy::Stored, true);
        assert_eq!(tickets[0].id, "T-1005");
    }
}
