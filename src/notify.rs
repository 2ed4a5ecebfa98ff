//! User-facing notifications.
//!
//! Every invocation ends in at most one notification: an informational
//! "displaying card" alert or a warning describing why no card was posted.
//! `NotificationCenter` mirrors each one to `tracing` and keeps the most
//! recent entries in a fixed-capacity ring buffer for later inspection.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warn,
}

/// A single notification stored in the ring buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub timestamp_ms: i64,
    pub level: NotificationLevel,
    pub message: String,
}

/// Destination for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NotificationLevel::Warn, message);
    }
}

// ---------------------------------------------------------------------------
// Ring buffer
// ---------------------------------------------------------------------------

pub const NOTIFICATION_LOG_CAPACITY: usize = 200;

/// Fixed-capacity circular buffer of notifications.
pub struct NotificationLog {
    entries: Vec<Option<Notification>>,
    capacity: usize,
    /// Write position (wraps around)
    write_pos: usize,
    /// Number of entries currently stored (≤ capacity)
    count: usize,
    /// Monotonically increasing ID for the next entry
    next_id: u64,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            capacity,
            write_pos: 0,
            count: 0,
            next_id: 1,
        }
    }

    /// Push a new entry. Returns the assigned entry ID.
    pub fn push(&mut self, level: NotificationLevel, message: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries[self.write_pos] = Some(Notification {
            id,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            level,
            message,
        });
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }

        id
    }

    /// Return entries oldest first, keeping only the last `limit` (0 = all).
    pub fn entries(&self, limit: usize) -> Vec<Notification> {
        if self.count == 0 {
            return Vec::new();
        }

        let effective_limit = if limit == 0 { self.count } else { limit.min(self.count) };

        // write_pos points at the oldest entry once the buffer is full
        let start = if self.count < self.capacity { 0 } else { self.write_pos };

        let skip = self.count - effective_limit;
        (skip..self.count)
            .filter_map(|i| self.entries[(start + i) % self.capacity].clone())
            .collect()
    }

    /// Remove all entries. IDs keep increasing.
    pub fn clear(&mut self) {
        for slot in self.entries.iter_mut() {
            *slot = None;
        }
        self.write_pos = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// ---------------------------------------------------------------------------
// Notification center
// ---------------------------------------------------------------------------

/// `Notifier` that logs through `tracing` and records into a `NotificationLog`.
pub struct NotificationCenter {
    log: Mutex<NotificationLog>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            log: Mutex::new(NotificationLog::new(capacity)),
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        self.log.lock().entries(limit)
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NOTIFICATION_LOG_CAPACITY)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => tracing::info!(target: "stream_mode::notify", "{message}"),
            NotificationLevel::Warn => tracing::warn!(target: "stream_mode::notify", "{message}"),
        }
        self.log.lock().push(level, message.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
