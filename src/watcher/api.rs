//! Public API for watcher types and commit delivery

pub use crate::watcher::delivery::{deliver_commit, DeliveryStats};
pub use crate::watcher::types::{
    CommitEvent, CommitRef, PatchEvent, RepoConfig, RepoWatcher, WatcherKind,
};
