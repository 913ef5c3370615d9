//! Rule set loading and reload policy

use crate::rules::engine::{RegexRuleEngine, RuleEngine};
use crate::rules::error::{RuleError, RuleResult};
use crate::rules::types::RuleSet;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use strum_macros::{Display, EnumString};

/// When a file-backed rule set is read from disk
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReloadPolicy {
    /// Re-read the file for every patch; edits apply immediately
    #[default]
    EveryCall,
    /// Read once and keep the compiled engine until invalidated
    Cached,
}

/// Supplies a ready rule engine to a plugin
pub trait RuleEngineLoader: Send + Sync {
    /// Human readable origin of the rules, for logs and errors
    fn origin(&self) -> String;

    fn load(&self) -> RuleResult<Arc<dyn RuleEngine>>;

    /// Drop any cached engine so the next `load` reads fresh rules
    fn invalidate(&self) {}
}

/// Loads a [`RegexRuleEngine`] from a JSON rule set file
pub struct RuleSetLoader {
    path: PathBuf,
    policy: ReloadPolicy,
    cached: RwLock<Option<Arc<dyn RuleEngine>>>,
}

impl RuleSetLoader {
    pub fn new<P: Into<PathBuf>>(path: P, policy: ReloadPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    /// Read and parse the rule set document without compiling it
    pub fn read_rule_set(&self) -> RuleResult<RuleSet> {
        let origin = self.path.display().to_string();
        let text = std::fs::read_to_string(&self.path).map_err(|source| RuleError::Io {
            path: origin.clone(),
            source,
        })?;
        RuleSet::from_json_str(&text, &origin)
    }

    fn compile(&self) -> RuleResult<Arc<dyn RuleEngine>> {
        let engine = RegexRuleEngine::new(self.read_rule_set()?)?;
        debug!(
            "compiled {} rules from {}",
            engine.rule_count(),
            self.path.display()
        );
        Ok(Arc::new(engine))
    }
}

impl std::fmt::Debug for RuleSetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cached
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false);
        f.debug_struct("RuleSetLoader")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("cached", &cached)
            .finish()
    }
}

impl RuleEngineLoader for RuleSetLoader {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> RuleResult<Arc<dyn RuleEngine>> {
        if self.policy == ReloadPolicy::EveryCall {
            return self.compile();
        }

        if let Some(engine) = self
            .cached
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return Ok(Arc::clone(engine));
        }

        let mut slot = self
            .cached
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Another caller may have filled the slot while we waited for the write lock
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }
        let engine = self.compile()?;
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    fn invalidate(&self) {
        let mut slot = self
            .cached
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.take().is_some() {
            debug!("dropped cached rules from {}", self.path.display());
        }
    }
}

/// Loader handing out an engine built elsewhere
pub struct PreloadedRules {
    origin: String,
    engine: Arc<dyn RuleEngine>,
}

impl PreloadedRules {
    pub fn new<O: Into<String>>(origin: O, engine: Arc<dyn RuleEngine>) -> Self {
        Self {
            origin: origin.into(),
            engine,
        }
    }
}

impl RuleEngineLoader for PreloadedRules {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn load(&self) -> RuleResult<Arc<dyn RuleEngine>> {
        Ok(Arc::clone(&self.engine))
    }
}
