//! Undo/redo snapshot stack with immediate and debounced recording.
//!
//! # Recording modes
//!
//! - [`History::push`] records a snapshot immediately. Discrete edits (add,
//!   remove, apply theme) use this.
//! - [`History::debounced_push`] arms a pending snapshot that is committed
//!   once no newer value has arrived for the debounce delay. Continuous edits
//!   (slider drags) use this so a burst produces a single entry.
//!
//! Time is passed in explicitly. The host calls [`History::poll`] from its
//! event loop tick to commit an expired pending value:
//!
//! ```
//! use std::time::{Duration, Instant};
//! use mesh_core::history::History;
//!
//! let mut history = History::new(0);
//! let t0 = Instant::now();
//! for value in 1..=5 {
//!     history.debounced_push(&value, t0 + Duration::from_millis(value * 10));
//! }
//! assert!(history.poll(t0 + Duration::from_secs(1)));
//! assert_eq!(*history.present(), 5);
//! assert_eq!(history.past().len(), 1);
//! ```
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Committed` | present matches the last recorded value, nothing pending |
//! | `Pending` | a debounced value is waiting for its deadline |
//! | `Suspended` | the recording gate is closed; debounced pushes are ignored |

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default number of past snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Upper bound accepted for the debounce delay.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// History tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of entries in `past`. Default: 30.
    pub limit: usize,
    /// Quiet period before a debounced value is committed. Default: 300ms.
    pub debounce: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Clamps values to usable ranges: a limit of at least 1 and a debounce
    /// of at most 10 seconds.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.limit = self.limit.max(1);
        self.debounce = self.debounce.min(Duration::from_millis(MAX_DEBOUNCE_MS));
        self
    }
}

/// Recording state of a [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Committed,
    Pending,
    Suspended,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Past/present/future snapshot stacks over any cloneable value.
///
/// `past` is ordered oldest first; `future` is ordered nearest first, so
/// `future[0]` is what the next redo restores.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    pending: Option<Pending<T>>,
    suspended: bool,
    config: HistoryConfig,
}

impl<T: Clone> History<T> {
    /// Creates a history with the default configuration.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        let config = config.validated();
        Self {
            past: VecDeque::with_capacity(config.limit),
            present: initial,
            future: VecDeque::new(),
            pending: None,
            suspended: false,
            config,
        }
    }

    /// Records `value` as the new present.
    ///
    /// The old present moves to `past`, `future` is cleared and any pending
    /// debounced value is dropped.
    pub fn push(&mut self, value: &T) {
        self.pending = None;
        let previous = std::mem::replace(&mut self.present, value.clone());
        self.push_past(previous);
        self.future.clear();
        tracing::debug!(past = self.past.len(), "history push");
    }

    /// Arms (or re-arms) the debounce slot with `value`.
    ///
    /// Returns `false` without recording anything while suspended.
    pub fn debounced_push(&mut self, value: &T, now: Instant) -> bool {
        if self.suspended {
            return false;
        }
        self.pending = Some(Pending {
            value: value.clone(),
            deadline: now + self.config.debounce,
        });
        true
    }

    /// Commits the pending value if its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.flush(),
            _ => false,
        }
    }

    /// Commits the pending value now, regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.push(&pending.value);
                true
            }
            None => false,
        }
    }

    /// Drops the pending value without recording it.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            tracing::debug!("history pending edit cancelled");
        }
        cancelled
    }

    /// Steps back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        tracing::debug!(past = self.past.len(), future = self.future.len(), "history undo");
        true
    }

    /// Steps forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        tracing::debug!(past = self.past.len(), future = self.future.len(), "history redo");
        true
    }

    /// Closes the recording gate.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Reopens the recording gate.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Empties `past` and `future`, keeping the present.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Replaces the present and drops everything else, including any pending value.
    pub fn reset(&mut self, initial: &T) {
        self.present = initial.clone();
        self.past.clear();
        self.future.clear();
        self.pending = None;
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> &VecDeque<T> {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<T> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Whether a debounced value is waiting to be committed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Suspension takes precedence over a pending value.
    pub fn state(&self) -> HistoryState {
        if self.suspended {
            HistoryState::Suspended
        } else if self.pending.is_some() {
            HistoryState::Pending
        } else {
            HistoryState::Committed
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    fn push_past(&mut self, value: T) {
        self.past.push_back(value);
        while self.past.len() > self.config.limit {
            self.past.pop_front();
        }
    }
}
