//! Plugin Trait
//!
//! The host streams commits to plugins through these hooks:
//! `commit_started`, then `patch` once per file, then `commit_finished`.
//! Hooks take `&self` because the host may call them from several repository
//! watchers at once.

use crate::plugin::error::PluginResult;
use crate::plugin::types::PluginInfo;
use crate::rules::api::SelfTestReport;
use crate::watcher::types::{CommitEvent, PatchEvent, RepoConfig, RepoWatcher};

#[async_trait::async_trait]
pub trait CommitPlugin: Send + Sync {
    /// Get plugin metadata
    fn plugin_info(&self) -> PluginInfo;

    /// Check if this plugin is compatible with the given host API version
    ///
    /// Defaults to false so plugins state their compatibility explicitly.
    fn is_compatible(&self, _system_api_version: u32) -> bool {
        false
    }

    /// One watcher per configured repository, in input order
    fn register_watchers(&self, repos: &[RepoConfig]) -> Vec<RepoWatcher>;

    async fn commit_started(&self, repo_name: &str, commit: &CommitEvent) -> PluginResult<()>;

    async fn patch(&self, repo_name: &str, patch: &PatchEvent) -> PluginResult<()>;

    async fn commit_finished(&self, repo_name: &str, commit: &CommitEvent) -> PluginResult<()>;

    /// Validate the plugin's own configuration; errors abort startup
    async fn self_test(&self) -> PluginResult<SelfTestReport>;
}
