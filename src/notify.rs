//! Best-effort desktop notifications
//!
//! Notifications are fire-and-forget: a notifier never reports failure to
//! its caller and never affects stored state.

use crate::config::NotificationConfig;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Message shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Discards notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Runs an external program, e.g. `notify-send`, with the title and body
/// as its last two arguments
///
/// The caller never waits on the child; a detached thread reaps it so
/// finished notifiers do not linger as zombies.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Parse a command line such as `notify-send -a support-desk`
    #[must_use]
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(&notification.title)
            .arg(&notification.body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                tracing::debug!(program = %self.program, pid = child.id(), "notification sent");
                reap(child);
            },
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "notification failed");
            },
        }
    }
}

fn reap(mut child: Child) -> JoinHandle<Option<ExitStatus>> {
    thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                tracing::debug!(%status, "notifier exited with failure");
            }
            Some(status)
        },
        Err(e) => {
            tracing::debug!(error = %e, "could not wait for notifier");
            None
        },
    })
}

/// Notifier selected by configuration
///
/// Notifications stay off unless they are enabled and a command is set.
#[must_use]
pub fn from_config(config: &NotificationConfig) -> Arc<dyn Notifier> {
    if !config.enabled {
        return Arc::new(NullNotifier);
    }

    match config.command.as_deref().and_then(CommandNotifier::parse) {
        Some(notifier) => Arc::new(notifier),
        None => {
            tracing::debug!("notifications enabled without a command, ignoring");
            Arc::new(NullNotifier)
        },
    }
}
