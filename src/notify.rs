//! Transient user-facing notifications.
//!
//! Every failure in the client ends up here: the TUI renders the newest
//! toast for a few seconds, the CLI prints it as a coloured stderr line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use owo_colors::OwoColorize;

use crate::error::{ErrorKind, ShopError};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Oldest toasts are dropped beyond this many
const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub timestamp: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    /// Toast for a failed operation, prefixed with what was being attempted
    pub fn from_error(context: &str, err: &ShopError) -> Self {
        let level = match err.kind() {
            ErrorKind::Validation => ToastLevel::Warning,
            _ => ToastLevel::Error,
        };
        Self::new(format!("{context}: {err}"), level)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.timestamp) >= TOAST_TTL
    }

    /// Print to stderr the way the CLI reports notifications
    pub fn eprint(&self) {
        match self.level {
            ToastLevel::Info => eprintln!("{} {}", "info:".cyan().bold(), self.message),
            ToastLevel::Warning => eprintln!("{} {}", "warning:".yellow().bold(), self.message),
            ToastLevel::Error => eprintln!("{} {}", "error:".red().bold(), self.message),
        }
    }
}

/// Bounded queue of pending toasts, newest last
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        tracing::debug!(level = ?toast.level, "notify: {}", toast.message);
        if self.queue.len() == MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(toast);
    }

    /// The toast that should currently be visible
    pub fn current(&self) -> Option<&Toast> {
        self.queue.back()
    }

    /// Drop toasts older than [`TOAST_TTL`]
    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|t| !t.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
