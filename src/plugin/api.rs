//! Public API for the plugin system

pub use crate::plugin::error::{PluginError, PluginResult};
pub use crate::plugin::patterns::{FilenamePattern, FilenamePreset};
pub use crate::plugin::scanning::{ScanningPlugin, ScanningPluginBuilder, NO_FILE};
pub use crate::plugin::settings::{DedupSettings, EmailSettings, PluginSettings, RuleSettings};
pub use crate::plugin::traits::CommitPlugin;
pub use crate::plugin::types::PluginInfo;
