use crate::cli::OutputFormatter;
use crate::config::{BackendKind, Config, IdStrategy};
use crate::core::{Priority, Status, Ticket, TicketId, sample_tickets};
use crate::error::Result;
use crate::notify;
use crate::storage::{FileBackend, JsonRepository, MemoryBackend, StorageBackend};
use crate::store::{IdGenerator, RandomIds, SequentialIds, TicketStore};
use colored::{ColoredString, Colorize};
use std::sync::Arc;

/// Common context for all handler operations
pub struct HandlerContext {
    pub config: Config,
    pub store: TicketStore,
}

impl HandlerContext {
    /// Open the ticket store described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let store = open_store(&config)?;
        Ok(Self { config, store })
    }

    /// Context over an already opened store
    #[must_use]
    pub fn with_store(config: Config, store: TicketStore) -> Self {
        Self { config, store }
    }

    /// Warn when a save failed during this command
    pub fn warn_if_unsaved(&self, output: &OutputFormatter) {
        let failures = self.store.persist_failures();
        if failures > 0 {
            output.warning(&format!(
                "{failures} change(s) could not be saved and will be lost when this command exits"
            ));
        }
    }
}

/// Build a [`TicketStore`] from configuration
pub fn open_store(config: &Config) -> Result<TicketStore> {
    let backend: Arc<dyn StorageBackend> = match config.storage.backend {
        BackendKind::File => {
            let dir = config.data_dir();
            tracing::debug!(dir = %dir.display(), "using file storage");
            Arc::new(FileBackend::new(dir))
        },
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    let repository = JsonRepository::new(backend, config.storage.key.clone());

    let ids: Arc<dyn IdGenerator> = match config.storage.id_strategy {
        IdStrategy::Sequential => Arc::new(SequentialIds),
        IdStrategy::Random => Arc::new(RandomIds::new()),
    };

    let seed = if config.storage.seed_sample_data {
        sample_tickets()?
    } else {
        Vec::new()
    };

    Ok(TicketStore::builder(repository)
        .ids(ids)
        .notifier(notify::from_config(&config.notifications))
        .seed(seed)
        .build())
}

/// Normalize a ticket reference typed by a user
///
/// `1001`, `t-1001` and `T-1001` all name `T-1001`. Anything else is
/// passed through unchanged so ids of hand-edited records still resolve.
#[must_use]
pub fn resolve_ticket_ref(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<TicketId>() {
        return id.to_string();
    }
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(number) = trimmed.parse::<u32>() {
            return TicketId::from_number(number).to_string();
        }
    }
    trimmed.to_string()
}

pub(crate) fn colored_status(status: Status) -> ColoredString {
    match status {
        Status::Open => status.as_str().blue(),
        Status::InProgress => status.as_str().yellow(),
        Status::Resolved => status.as_str().green(),
        Status::Closed => status.as_str().dimmed(),
    }
}

pub(crate) fn colored_priority(priority: Priority) -> ColoredString {
    match priority {
        Priority::Low => priority.as_str().dimmed(),
        Priority::Medium => priority.as_str().normal(),
        Priority::High => priority.as_str().yellow(),
        Priority::Critical => priority.as_str().red().bold(),
    }
}

/// One-line summary used by list-style commands
pub(crate) fn ticket_row(ticket: &Ticket) -> String {
    format!(
        "{:<8} {:<11} {:<8} {:<18} {}",
        ticket.id.as_str(),
        colored_status(ticket.status),
        colored_priority(ticket.priority),
        truncate(&ticket.gcp_service, 18),
        ticket.title
    )
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_ticket_ref() {
        assert_eq!(resolve_ticket_ref("1001"), "T-1001");
        assert_eq!(resolve_ticket_ref(" t-1002 "), "T-1002");
        assert_eq!(resolve_ticket_ref("legacy-7"), "legacy-7");
        assert_eq!(resolve_ticket_ref("42"), "T-0042");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("BigQuery", 18), "BigQuery");
        assert_eq!(truncate("Kubernetes Engine Autopilot", 10), "Kubernete…");
    }

    #[test]
    fn test_open_store_with_seed_in_memory() {
        let config = Config {
            storage: StorageConfig {
                backend: BackendKind::Memory,
                seed_sample_data: true,
                ..StorageConfig::default()
            },
            ..Config::default()
        };

        let mut ctx = HandlerContext::new(config).unwrap();
        assert_eq!(ctx.store.all_tickets().len(), 5);
    }

    #[test]
    fn test_open_store_on_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            storage: StorageConfig {
                data_dir: Some(temp_dir.path().to_path_buf()),
                key: "desk".to_string(),
                ..StorageConfig::default()
            },
            ..Config::default()
        };

        let mut store = open_store(&config).unwrap();
        assert!(store.all_tickets().is_empty());
        store.add_comment("T-1001", "nobody home", "a@example.com").unwrap_err();
        assert!(!temp_dir.path().join("desk.json").exists());
    }
}
