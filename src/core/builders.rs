use super::{Comment, CommentId, Priority, Status, Ticket, TicketId};
use chrono::{DateTime, Utc};

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    service: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    comments: Vec<Comment>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the service label
    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set the reporter
    #[must_use]
    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Set the assignee
    #[must_use]
    pub fn assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Set `created_at`; `updated_at` follows it unless set explicitly
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `updated_at` timestamp
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Add a single comment
    #[must_use]
    pub fn comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Build the ticket
    ///
    /// Comments are re-pointed at the ticket's id.
    pub fn build(self) -> Ticket {
        let id = self.id.unwrap_or_else(|| TicketId::from_number(1000));
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let comments = self
            .comments
            .into_iter()
            .map(|mut c| {
                c.ticket_id = id.clone();
                c
            })
            .collect();

        Ticket {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            gcp_service: self.service.unwrap_or_else(|| "Other".to_string()),
            created_by: self.created_by.unwrap_or_default(),
            assigned_to: self.assigned_to,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at).max(created_at),
            comments,
        }
    }
}

/// Builder for creating Comment instances
#[derive(Default)]
pub struct CommentBuilder {
    id: Option<CommentId>,
    ticket_id: Option<TicketId>,
    content: Option<String>,
    author: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl CommentBuilder {
    /// Create a new comment builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: CommentId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn ticket_id(mut self, ticket_id: TicketId) -> Self {
        self.ticket_id = Some(ticket_id);
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the comment
    pub fn build(self) -> Comment {
        Comment {
            id: self.id.unwrap_or_else(|| CommentId::from_number(100)),
            ticket_id: self
                .ticket_id
                .unwrap_or_else(|| TicketId::from_number(1000)),
            content: self.content.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_builder() {
        let ticket = TicketBuilder::new()
            .id(TicketId::from_number(1003))
            .title("Need assistance with Cloud Run deployment")
            .description("Build errors")
            .priority(Priority::Medium)
            .status(Status::Resolved)
            .service("Cloud Run")
            .created_by("mike@example.com")
            .assigned_to("devops@gcp-team.com")
            .build();

        assert_eq!(ticket.id, "T-1003");
        assert_eq!(ticket.status, Status::Resolved);
        assert_eq!(ticket.gcp_service, "Cloud Run");
        assert_eq!(ticket.assigned_to.as_deref(), Some("devops@gcp-team.com"));
        assert_eq!(ticket.created_at, ticket.updated_at);
    }

    #[test]
    fn test_builder_repoints_comments() {
        let comment = CommentBuilder::new()
            .ticket_id(TicketId::from_number(1))
            .content("Could you share the error?")
            .author("devops@gcp-team.com")
            .build();

        let ticket = TicketBuilder::new()
            .id(TicketId::from_number(1003))
            .comment(comment)
            .build();

        assert_eq!(ticket.comments.len(), 1);
        assert_eq!(ticket.comments[0].ticket_id, ticket.id);
    }

    #[test]
    fn test_updated_at_never_before_created_at() {
        let created = Utc::now();
        let ticket = TicketBuilder::new()
            .created_at(created)
            .updated_at(created - chrono::Duration::days(1))
            .build();
        assert_eq!(ticket.updated_at, created);
    }
}
