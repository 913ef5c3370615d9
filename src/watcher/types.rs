//! Commit, patch and watcher types shared between the host and plugins

use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Identity of a commit, shared by every patch it contains
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommitRef {
    pub identifier: String,
    pub url: String,
}

/// One file-level change within a commit
#[derive(Debug, Clone, PartialEq)]
pub struct PatchEvent {
    pub filename: String,
    /// New or changed lines, in diff order
    pub added_lines: Vec<String>,
    pub commit: Arc<CommitRef>,
}

impl PatchEvent {
    /// The commit this patch belongs to
    pub fn commit(&self) -> &CommitRef {
        &self.commit
    }
}

/// One commit as streamed by a repository watcher
#[derive(Debug, Clone, PartialEq)]
pub struct CommitEvent {
    commit: Arc<CommitRef>,
    patches: Vec<PatchEvent>,
}

impl CommitEvent {
    pub fn new<I: Into<String>, U: Into<String>>(identifier: I, url: U) -> Self {
        Self {
            commit: Arc::new(CommitRef {
                identifier: identifier.into(),
                url: url.into(),
            }),
            patches: Vec::new(),
        }
    }

    /// Append a patch for `filename` carrying `added_lines`
    pub fn with_patch<F, L, S>(mut self, filename: F, added_lines: L) -> Self
    where
        F: Into<String>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patches.push(PatchEvent {
            filename: filename.into(),
            added_lines: added_lines.into_iter().map(Into::into).collect(),
            commit: Arc::clone(&self.commit),
        });
        self
    }

    pub fn identifier(&self) -> &str {
        &self.commit.identifier
    }

    pub fn url(&self) -> &str {
        &self.commit.url
    }

    pub fn commit_ref(&self) -> &CommitRef {
        &self.commit
    }

    pub fn patches(&self) -> &[PatchEvent] {
        &self.patches
    }
}

/// Kind of source-control system a watcher subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum WatcherKind {
    Perforce,
    Github,
    /// Wildcard used when the configured type is not supported
    All,
}

impl WatcherKind {
    /// Map a configured repository type to a concrete watcher kind.
    ///
    /// Only concrete systems are accepted here; `All` is a fallback, not a
    /// configurable type.
    pub fn from_repo_type(repo_type: &str) -> Option<Self> {
        match repo_type {
            "perforce" => Some(WatcherKind::Perforce),
            "github" => Some(WatcherKind::Github),
            _ => None,
        }
    }
}

/// A repository entry from the settings file
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepoConfig {
    #[serde(rename = "type")]
    pub repo_type: String,
    pub name: String,
}

impl RepoConfig {
    pub fn new<T: Into<String>, N: Into<String>>(repo_type: T, name: N) -> Self {
        Self {
            repo_type: repo_type.into(),
            name: name.into(),
        }
    }
}

/// Subscription handle returned by plugin registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoWatcher {
    pub plugin_name: String,
    pub kind: WatcherKind,
    pub repo_name: String,
}
