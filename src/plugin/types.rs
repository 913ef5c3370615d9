//! Plugin metadata

/// Plugin metadata information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub api_version: u32,
}
