//! Behavioural tests for the ticket store through the public API

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use support_desk::TicketStore;
use support_desk::core::{NewTicket, Priority, Status, TicketUpdate, sample_tickets};
use support_desk::storage::{
    JsonRepository, MemoryBackend, StorageBackend, TicketRepository, DEFAULT_STORAGE_KEY,
};
use support_desk::store::{ManualClock, SequentialIds, TicketFilter};

struct Harness {
    backend: Arc<MemoryBackend>,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            clock: Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            )),
        }
    }

    fn seeded() -> Self {
        let harness = Self::new();
        harness
            .repository()
            .save_all(&sample_tickets().unwrap())
            .unwrap();
        harness
    }

    /// Samples already stored, with a quota that leaves no room for more
    fn nearly_full() -> Self {
        let payload = serde_json::to_string(&sample_tickets().unwrap()).unwrap();
        let harness = Self {
            backend: Arc::new(MemoryBackend::with_quota(
                DEFAULT_STORAGE_KEY.len() + payload.len() + 10,
            )),
            ..Self::new()
        };
        harness.backend.set_item(DEFAULT_STORAGE_KEY, &payload).unwrap();
        harness
    }

    fn stored_len(&self) -> usize {
        self.repository().load_all().unwrap().map_or(0, |t| t.len())
    }

    fn repository(&self) -> JsonRepository {
        let backend: Arc<dyn StorageBackend> = self.backend.clone();
        JsonRepository::with_default_key(backend)
    }

    fn store(&self) -> TicketStore {
        TicketStore::builder(self.repository())
            .ids(Arc::new(SequentialIds))
            .clock(self.clock.clone())
            .build()
    }
}

fn new_ticket(title: &str) -> NewTicket {
    NewTicket {
        title: title.to_string(),
        description: "Pods restart every few minutes".to_string(),
        priority: Priority::High,
        gcp_service: "Kubernetes Engine".to_string(),
        created_by: "sre@example.com".to_string(),
        status: Status::Open,
    }
}

#[test]
fn created_ticket_starts_clean() {
    let harness = Harness::new();
    let mut store = harness.store();

    let ticket = store.create_ticket(new_ticket("GKE crash loop")).unwrap();
    assert_eq!(ticket.created_at, ticket.updated_at);
    assert!(ticket.comments.is_empty());
    assert_eq!(ticket.assigned_to, None);
    assert_eq!(store.ticket(ticket.id.as_str()), Some(ticket));
}

#[test]
fn comments_append_in_order() {
    let harness = Harness::new();
    let mut store = harness.store();
    let ticket = store.create_ticket(new_ticket("GKE crash loop")).unwrap();

    for n in 0..4 {
        harness.clock.advance(Duration::minutes(1));
        store
            .add_comment(ticket.id.as_str(), &format!("note {n}"), "sre@example.com")
            .unwrap();
    }

    let stored = store.ticket(ticket.id.as_str()).unwrap();
    assert_eq!(stored.comments.len(), 4);
    for (n, comment) in stored.comments.iter().enumerate() {
        assert_eq!(comment.ticket_id, ticket.id);
        assert_eq!(comment.content, format!("note {n}"));
    }
    assert!(stored.updated_at > stored.created_at);
}

#[test]
fn updated_at_never_goes_back() {
    let harness = Harness::new();
    let mut store = harness.store();
    let ticket = store.create_ticket(new_ticket("GKE crash loop")).unwrap();

    harness.clock.advance(Duration::hours(-3));
    let updated = store
        .update_ticket(
            ticket.id.as_str(),
            TicketUpdate {
                priority: Some(Priority::Critical),
                ..TicketUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.updated_at, ticket.updated_at);

    store
        .add_comment(ticket.id.as_str(), "still broken", "sre@example.com")
        .unwrap();
    assert!(store.ticket(ticket.id.as_str()).unwrap().updated_at >= ticket.updated_at);
}

#[test]
fn empty_filter_keeps_everything() {
    let harness = Harness::seeded();
    let mut store = harness.store();

    assert_eq!(store.filter(&TicketFilter::new()), store.all_tickets());
}

#[test]
fn search_finds_bigquery_ticket() {
    let harness = Harness::seeded();
    let mut store = harness.store();

    let hits: Vec<_> = store
        .search("BigQuery")
        .into_iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(hits, ["T-1002"]);
}

#[test]
fn saved_collection_reloads_equal() {
    let harness = Harness::seeded();
    let mut store = harness.store();
    store.create_ticket(new_ticket("GKE crash loop")).unwrap();
    store.assign("T-1002", Some("devops@gcp-team.com")).unwrap();

    let reloaded = harness.repository().load_all().unwrap().unwrap();
    assert_eq!(reloaded, store.all_tickets());
    assert_eq!(harness.store().all_tickets(), reloaded);
}

#[test]
fn listing_is_stable_without_mutation() {
    let harness = Harness::seeded();
    let mut store = harness.store();
    assert_eq!(store.all_tickets(), store.all_tickets());
}

#[test]
fn last_write_wins_between_stores() {
    let harness = Harness::seeded();
    let mut first = harness.store();
    let mut second = harness.store();

    first.set_status("T-1005", Status::Resolved).unwrap();
    second.set_status("T-1005", Status::Closed).unwrap();

    assert_eq!(first.ticket("T-1005").unwrap().status, Status::Closed);
}

#[test]
fn unknown_ticket_is_an_error_not_a_panic() {
    let harness = Harness::seeded();
    let mut store = harness.store();

    assert!(store.ticket("T-4242").is_none());
    assert!(store.update_ticket("T-4242", TicketUpdate::status(Status::Closed)).is_err());
    assert!(store.add_comment("T-4242", "hello", "a@example.com").is_err());
    assert!(store.assign("T-4242", Some("a@example.com")).is_err());
}

#[test]
fn full_backend_keeps_in_memory_view() {
    let backend = Arc::new(MemoryBackend::with_quota(64));
    let repository = JsonRepository::new(backend.clone(), DEFAULT_STORAGE_KEY);
    let mut store = TicketStore::builder(repository).build();

    let ticket = store.create_ticket(new_ticket("GKE crash loop")).unwrap();
    assert_eq!(store.persist_failures(), 1);
    assert!(backend.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    assert_eq!(store.ticket(ticket.id.as_str()), Some(ticket));
}

#[test]
fn failed_save_after_earlier_saves_keeps_the_change() {
    let harness = Harness::nearly_full();
    let mut store = harness.store();

    let ticket = store.create_ticket(new_ticket("GKE crash loop")).unwrap();
    assert_eq!(ticket.id, "T-1006");
    assert_eq!(store.persist_failures(), 1);
    assert_eq!(harness.stored_len(), 5);

    assert_eq!(store.ticket("T-1006"), Some(ticket.clone()));
    let all = store.all_tickets();
    assert_eq!(all.len(), 6);
    assert!(all.contains(&ticket));

    let next = store.create_ticket(new_ticket("GKE autoscaler")).unwrap();
    assert_eq!(next.id, "T-1007");
    assert_eq!(store.filter(&TicketFilter::new()).len(), 7);
}

#[test]
fn failed_update_is_still_visible() {
    let harness = Harness::nearly_full();
    let mut store = harness.store();

    store
        .update_ticket(
            "T-1002",
            TicketUpdate {
                description: Some("x".repeat(200)),
                ..TicketUpdate::default()
            },
        )
        .unwrap();
    assert!(store.has_unsaved_changes());

    assert_eq!(store.ticket("T-1002").unwrap().description, "x".repeat(200));
    assert_eq!(store.search(&"x".repeat(50))[0].id, "T-1002");
    assert_ne!(
        harness.store().ticket("T-1002").unwrap().description,
        "x".repeat(200)
    );
}

#[test]
fn comment_ids_stay_three_digits_across_the_desk() {
    let harness = Harness::seeded();
    let mut store = harness.store();

    for ticket in ["T-1002", "T-1005"] {
        for n in 0..5 {
            store
                .add_comment(ticket, &format!("note {n}"), "sre@example.com")
                .unwrap();
        }
    }

    for ticket in store.all_tickets() {
        let mut ids: Vec<_> = ticket.comments.iter().map(|c| c.id.clone()).collect();
        assert!(ids.iter().all(|id| id.as_str().len() == 5));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), ticket.comments.len());
    }
}
