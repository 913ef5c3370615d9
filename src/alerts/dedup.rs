//! Alert deduplication
//!
//! Every dispatch attempt asks an [`AlertDeduplicator`] first. The identity is
//! recorded before the transport is called, so a failed send is never retried by
//! an identical follow-up match.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use strum_macros::{Display, EnumString};

/// Key identifying an alert for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertIdentity {
    pub commit_url: String,
    pub filename: String,
    pub subject: String,
    pub offending_line: String,
}

impl AlertIdentity {
    pub fn new(commit_url: &str, filename: &str, subject: &str, offending_line: &str) -> Self {
        Self {
            commit_url: commit_url.to_string(),
            filename: filename.to_string(),
            subject: subject.to_string(),
            offending_line: offending_line.to_string(),
        }
    }
}

pub trait AlertDeduplicator: Send + Sync {
    /// Record `identity` and report whether it should be dispatched.
    /// Returns `false` for a suppressed duplicate.
    fn check_and_remember(&self, identity: &AlertIdentity) -> bool;
}

/// Deduplication strategy selectable from settings
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DedupStrategy {
    /// Suppress only an immediate repeat of the last alert
    #[default]
    Last,
    /// Suppress any repeat among the most recent alerts
    Lru,
    /// Dispatch everything
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Disabled,
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Remembers only the most recent identity
#[derive(Debug, Default)]
pub struct LastAlertDedup {
    last: Mutex<Option<AlertIdentity>>,
}

impl LastAlertDedup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<AlertIdentity> {
        lock_recovering(&self.last).clone()
    }

    pub fn clear(&self) {
        *lock_recovering(&self.last) = None;
    }
}

impl AlertDeduplicator for LastAlertDedup {
    fn check_and_remember(&self, identity: &AlertIdentity) -> bool {
        let mut last = lock_recovering(&self.last);
        if last.as_ref() == Some(identity) {
            return false;
        }
        *last = Some(identity.clone());
        true
    }
}

#[derive(Debug, Default)]
struct LruState {
    order: VecDeque<AlertIdentity>,
    seen: HashSet<AlertIdentity>,
}

/// Remembers up to `capacity` recent identities, evicting the least recently seen
#[derive(Debug)]
pub struct LruDedup {
    capacity: usize,
    state: Mutex<LruState>,
}

impl LruDedup {
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        lock_recovering(&self.state).order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertDeduplicator for LruDedup {
    fn check_and_remember(&self, identity: &AlertIdentity) -> bool {
        let mut state = lock_recovering(&self.state);

        if state.seen.contains(identity) {
            // Refresh recency
            if let Some(pos) = state.order.iter().position(|seen| seen == identity) {
                if let Some(entry) = state.order.remove(pos) {
                    state.order.push_back(entry);
                }
            }
            return false;
        }

        if state.order.len() >= self.capacity {
            if let Some(evicted) = state.order.pop_front() {
                state.seen.remove(&evicted);
            }
        }
        state.seen.insert(identity.clone());
        state.order.push_back(identity.clone());
        true
    }
}

/// Never suppresses anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDedup;

impl AlertDeduplicator for NoDedup {
    fn check_and_remember(&self, _identity: &AlertIdentity) -> bool {
        true
    }
}
