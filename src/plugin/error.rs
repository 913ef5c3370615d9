//! Plugin Error Handling

use crate::alerts::api::AlertError;
use crate::core::error_handling::ContextualError;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Rule set, filename pattern or settings unusable; fix the configuration
    #[error("Configuration error in plugin '{plugin_name}': {message}")]
    Configuration {
        plugin_name: String,
        message: String,
    },

    /// Rule set loaded but failed its own fixtures
    #[error("Rule self-test failed for plugin '{plugin_name}':\n{report}")]
    Validation { plugin_name: String, report: String },

    /// Alert dispatch failed; not retried
    #[error("Failed to dispatch alert '{subject}': {source}")]
    Transport {
        subject: String,
        #[source]
        source: AlertError,
    },

    /// Repository type has no watcher kind; registration falls back to a wildcard
    #[error("Repo Type '{repo_type}' not supported yet (repository '{repo_name}')")]
    UnsupportedRepoType {
        repo_type: String,
        repo_name: String,
    },
}

impl PluginError {
    pub fn configuration<N: Into<String>, E: std::fmt::Display>(plugin_name: N, cause: E) -> Self {
        PluginError::Configuration {
            plugin_name: plugin_name.into(),
            message: cause.to_string(),
        }
    }
}

impl ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        match self {
            PluginError::Configuration { .. } => true,
            PluginError::Validation { .. } => true,
            PluginError::Transport { .. } => false,
            PluginError::UnsupportedRepoType { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PluginError::Configuration { message, .. } => Some(message),
            PluginError::Validation { report, .. } => Some(report),
            _ => None,
        }
    }
}
