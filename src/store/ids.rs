use crate::core::{CommentId, Ticket, TicketId};
use crate::error::{DeskError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Mutex;

/// Smallest ticket number handed out
pub const FIRST_TICKET_NUMBER: u32 = 1001;
/// Largest ticket number handed out; ids never grow past four digits
pub const LAST_TICKET_NUMBER: u32 = 9999;
/// Smallest comment number handed out
pub const FIRST_COMMENT_NUMBER: u32 = 100;
/// Largest comment number handed out; ids never grow past three digits
pub const LAST_COMMENT_NUMBER: u32 = 999;

const RANDOM_ATTEMPTS: usize = 64;

/// Produces identifiers for new tickets and comments
///
/// Generators see what is already in use so they can avoid it. When every
/// number in the range is taken they return [`DeskError::IdsExhausted`].
pub trait IdGenerator: Send + Sync {
    fn ticket_id(&self, existing: &[Ticket]) -> Result<TicketId>;

    /// Comment numbers only need to be unique within `ticket`
    fn comment_id(&self, ticket: &Ticket) -> Result<CommentId>;
}

fn used_ticket_numbers(existing: &[Ticket]) -> HashSet<u32> {
    existing.iter().filter_map(|t| t.id.number()).collect()
}

fn used_comment_numbers(ticket: &Ticket) -> HashSet<u32> {
    ticket.comments.iter().filter_map(|c| c.id.number()).collect()
}

/// One above the largest number in use, or the lowest free number in
/// `range` once that would leave it
fn next_number(used: &HashSet<u32>, range: RangeInclusive<u32>) -> Option<u32> {
    let first = *range.start();
    let above_max = match used.iter().max() {
        Some(max) => max.checked_add(1).map(|n| n.max(first)),
        None => Some(first),
    };

    above_max
        .filter(|n| range.contains(n))
        .or_else(|| range.into_iter().find(|n| !used.contains(n)))
}

/// Next number above everything in use
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds;

impl IdGenerator for SequentialIds {
    fn ticket_id(&self, existing: &[Ticket]) -> Result<TicketId> {
        let used = used_ticket_numbers(existing);
        next_number(&used, FIRST_TICKET_NUMBER..=LAST_TICKET_NUMBER)
            .map(TicketId::from_number)
            .ok_or_else(|| DeskError::IdsExhausted("ticket".to_string()))
    }

    fn comment_id(&self, ticket: &Ticket) -> Result<CommentId> {
        let used = used_comment_numbers(ticket);
        next_number(&used, FIRST_COMMENT_NUMBER..=LAST_COMMENT_NUMBER)
            .map(CommentId::from_number)
            .ok_or_else(|| DeskError::IdsExhausted(format!("comment on {}", ticket.id)))
    }
}

/// Random four-digit ticket and three-digit comment numbers
///
/// A drawn number already in use is redrawn; once the attempts run out
/// the sequential scheme picks the number instead.
#[derive(Debug)]
pub struct RandomIds {
    rng: Mutex<StdRng>,
}

impl RandomIds {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self, range: RangeInclusive<u32>, used: &HashSet<u32>) -> Option<u32> {
        let mut rng = self.rng.lock().ok()?;
        (0..RANDOM_ATTEMPTS)
            .map(|_| rng.gen_range(range.clone()))
            .find(|n| !used.contains(n))
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn ticket_id(&self, existing: &[Ticket]) -> Result<TicketId> {
        let used = used_ticket_numbers(existing);
        match self.draw(1000..=LAST_TICKET_NUMBER, &used) {
            Some(n) => Ok(TicketId::from_number(n)),
            None => {
                tracing::warn!("random ticket ids exhausted, falling back to sequential");
                SequentialIds.ticket_id(existing)
            },
        }
    }

    fn comment_id(&self, ticket: &Ticket) -> Result<CommentId> {
        let used = used_comment_numbers(ticket);
        match self.draw(FIRST_COMMENT_NUMBER..=LAST_COMMENT_NUMBER, &used) {
            Some(n) => Ok(CommentId::from_number(n)),
            None => {
                tracing::warn!(
                    ticket = %ticket.id,
                    "random comment ids exhausted, falling back to sequential"
                );
                SequentialIds.comment_id(ticket)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CommentBuilder, TicketBuilder, sample_tickets};

    fn ticket_numbered(n: u32) -> Ticket {
        TicketBuilder::new().id(TicketId::from_number(n)).build()
    }

    fn ticket_with_comments(numbers: impl IntoIterator<Item = u32>) -> Ticket {
        numbers
            .into_iter()
            .fold(TicketBuilder::new(), |builder, n| {
                builder.comment(CommentBuilder::new().id(CommentId::from_number(n)).build())
            })
            .build()
    }

    #[test]
    fn test_sequential_on_empty_collection() {
        assert_eq!(SequentialIds.ticket_id(&[]).unwrap(), "T-1001");
        assert_eq!(SequentialIds.comment_id(&ticket_with_comments([])).unwrap(), "C-100");
    }

    #[test]
    fn test_sequential_continues_after_sample_data() {
        let tickets = sample_tickets().unwrap();
        assert_eq!(SequentialIds.ticket_id(&tickets).unwrap(), "T-1006");

        let t1004 = tickets.iter().find(|t| t.id == "T-1004").unwrap();
        assert_eq!(SequentialIds.comment_id(t1004).unwrap(), "C-108");
        let t1002 = tickets.iter().find(|t| t.id == "T-1002").unwrap();
        assert_eq!(SequentialIds.comment_id(t1002).unwrap(), "C-100");
    }

    #[test]
    fn test_sequential_ignores_malformed_ids() {
        let mut ticket = TicketBuilder::new()
            .id(TicketId::from_number(1))
            .comment(CommentBuilder::new().id(CommentId::from_number(3)).build())
            .build();
        ticket.id = serde_json::from_str("\"legacy\"").unwrap();

        assert_eq!(SequentialIds.ticket_id(&[ticket.clone()]).unwrap(), "T-1001");
        assert_eq!(SequentialIds.comment_id(&ticket).unwrap(), "C-100");
    }

    #[test]
    fn test_ticket_numbers_stay_four_digits() {
        let tickets = vec![ticket_numbered(9999), ticket_numbered(1001)];
        assert_eq!(SequentialIds.ticket_id(&tickets).unwrap(), "T-1002");

        let tickets = vec![ticket_numbered(9998)];
        assert_eq!(SequentialIds.ticket_id(&tickets).unwrap(), "T-9999");
    }

    #[test]
    fn test_huge_stored_ticket_number_does_not_overflow() {
        let tickets = vec![ticket_numbered(u32::MAX), ticket_numbered(1001)];
        assert_eq!(tickets[0].id, "T-4294967295");
        assert_eq!(SequentialIds.ticket_id(&tickets).unwrap(), "T-1002");
        assert_eq!(RandomIds::seeded(3).ticket_id(&tickets).unwrap().as_str().len(), 6);
    }

    #[test]
    fn test_full_ticket_range_is_an_error() {
        let tickets: Vec<_> = (FIRST_TICKET_NUMBER..=LAST_TICKET_NUMBER)
            .map(ticket_numbered)
            .collect();
        assert!(matches!(
            SequentialIds.ticket_id(&tickets),
            Err(DeskError::IdsExhausted(_))
        ));
    }

    #[test]
    fn test_comment_numbers_are_per_ticket() {
        let busy = ticket_with_comments(100..=998);
        let quiet = ticket_with_comments([100, 101]);

        assert_eq!(SequentialIds.comment_id(&busy).unwrap(), "C-999");
        assert_eq!(SequentialIds.comment_id(&quiet).unwrap(), "C-102");
    }

    #[test]
    fn test_comment_numbers_stay_three_digits() {
        let ticket = ticket_with_comments([100, 999]);
        assert_eq!(SequentialIds.comment_id(&ticket).unwrap(), "C-101");

        let full = ticket_with_comments(FIRST_COMMENT_NUMBER..=LAST_COMMENT_NUMBER);
        assert!(SequentialIds.comment_id(&full).is_err());
        assert!(RandomIds::seeded(5).comment_id(&full).is_err());
    }

    #[test]
    fn test_random_ids_in_range_and_unused() {
        let tickets = sample_tickets().unwrap();
        let ids = RandomIds::seeded(7);

        for ticket in tickets.iter().cycle().take(50) {
            let id = ids.ticket_id(&tickets).unwrap();
            let n = id.number().unwrap();
            assert!((1000..10000).contains(&n));
            assert!(tickets.iter().all(|t| t.id != id));

            let comment = ids.comment_id(ticket).unwrap();
            let n = comment.number().unwrap();
            assert!((100..1000).contains(&n));
            assert!(ticket.comments.iter().all(|c| c.id != comment));
        }
    }

    #[test]
    fn test_random_ids_are_reproducible_with_seed() {
        let a = RandomIds::seeded(42);
        let b = RandomIds::seeded(42);
        assert_eq!(a.ticket_id(&[]).unwrap(), b.ticket_id(&[]).unwrap());
    }
}
