//! Repository Watchers
//!
//! Commit and patch events as streamed by the host's watcher registry, watcher
//! handles returned at registration, and a driver delivering commits to plugins.

pub(crate) mod delivery;
pub(crate) mod types;

pub mod api;
