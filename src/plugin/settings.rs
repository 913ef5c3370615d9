//! Plugin settings file
//!
//! Settings are read from TOML. Without an explicit path the default location
//! `<config dir>/PatchAlert/patchalert.toml` is used when it exists; otherwise
//! defaults apply.
//!
//! ```toml
//! product = "Providence Email"
//!
//! [email]
//! to = ["security@example.com"]
//!
//! [[repos]]
//! type = "github"
//! name = "acme/payments"
//!
//! [rules]
//! reload = "cached"
//!
//! [dedup]
//! strategy = "lru"
//! capacity = 512
//! ```

use crate::alerts::api::{deduplicator_for, AlertDeduplicator, DedupStrategy};
use crate::plugin::error::{PluginError, PluginResult};
use crate::rules::api::ReloadPolicy;
use crate::watcher::types::RepoConfig;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SETTINGS_SCOPE: &str = "settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    /// Alert recipients; a single address or a list
    #[serde(deserialize_with = "string_or_list")]
    pub to: Vec<String>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self { to: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub reload: ReloadPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupSettings {
    pub strategy: DedupStrategy,
    /// Only used by the `lru` strategy
    pub capacity: usize,
}

impl Default for DedupSettings {
    fn default() -> Self {
        Self {
            strategy: DedupStrategy::Last,
            capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Product name shown in alert subjects: `[<product> Alert] - ...`
    pub product: String,
    pub email: EmailSettings,
    pub repos: Vec<RepoConfig>,
    pub rules: RuleSettings,
    pub dedup: DedupSettings,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            product: Self::DEFAULT_PRODUCT.to_string(),
            email: EmailSettings::default(),
            repos: Vec::new(),
            rules: RuleSettings::default(),
            dedup: DedupSettings::default(),
        }
    }
}

impl PluginSettings {
    pub const DEFAULT_PRODUCT: &'static str = "Providence Email";

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("PatchAlert").join("patchalert.toml"))
    }

    pub fn from_toml_str(text: &str, origin: &str) -> PluginResult<Self> {
        toml::from_str::<Self>(text).map_err(|e| {
            PluginError::configuration(
                SETTINGS_SCOPE,
                format!("Error parsing configuration file {}: {}", origin, e),
            )
        })
    }

    /// Load settings from `path`, or from the default location when `None`
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub async fn load(path: Option<&Path>) -> PluginResult<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PluginError::configuration(
                        SETTINGS_SCOPE,
                        format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    ));
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(default) if default.exists() => default,
                _ => {
                    debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| {
                PluginError::configuration(
                    SETTINGS_SCOPE,
                    format!(
                        "Error reading configuration file {}: {}",
                        config_path.display(),
                        e
                    ),
                )
            })?;

        debug!("Loaded configuration from {}", config_path.display());
        Self::from_toml_str(&contents, &config_path.display().to_string())
    }

    pub fn recipients(&self) -> &[String] {
        &self.email.to
    }

    /// Deduplicator for the configured strategy. `last` is process-wide.
    pub fn deduplicator(&self) -> Arc<dyn AlertDeduplicator> {
        deduplicator_for(self.dedup.strategy, self.dedup.capacity)
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(address) => vec![address],
        OneOrMany::Many(addresses) => addresses,
    })
}
