//! Host-side commit delivery
//!
//! Feeds one commit through a plugin's hooks the way the watcher registry does:
//! `commit_started`, every patch in order, then `commit_finished`. A failing patch
//! is logged and counted; it never stops the remaining patches.

use crate::core::error_handling::ContextualError;
use crate::plugin::api::CommitPlugin;
use crate::watcher::types::CommitEvent;
use log::{error, warn};

/// Outcome of delivering one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryStats {
    pub patches: usize,
    pub failures: usize,
}

pub async fn deliver_commit(
    plugin: &dyn CommitPlugin,
    repo_name: &str,
    commit: &CommitEvent,
) -> DeliveryStats {
    let plugin_name = plugin.plugin_info().name;
    let mut stats = DeliveryStats::default();

    if let Err(e) = plugin.commit_started(repo_name, commit).await {
        warn!("{}: commit_started failed for {}: {}", plugin_name, commit.identifier(), e);
    }

    for patch in commit.patches() {
        stats.patches += 1;
        if let Err(e) = plugin.patch(repo_name, patch).await {
            stats.failures += 1;
            match e.user_message() {
                Some(message) if e.is_user_actionable() => {
                    error!("{}: {} ({})", plugin_name, message, patch.filename)
                }
                _ => error!("{}: {} ({})", plugin_name, e, patch.filename),
            }
        }
    }

    if let Err(e) = plugin.commit_finished(repo_name, commit).await {
        warn!("{}: commit_finished failed for {}: {}", plugin_name, commit.identifier(), e);
    }

    stats
}
