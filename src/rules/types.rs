//! Rule set document model
//!
//! A rule set is read from JSON in one of two shapes, both keeping definition order:
//!
//! ```json
//! [{"id": "debug-password", "pattern": "System\\.debug\\(.*[Pp]assword.*\\)", "metadata": "Password logged"}]
//! ```
//!
//! ```json
//! {"debug-password": {"pattern": "System\\.debug\\(.*[Pp]assword.*\\)", "metadata": "Password logged"}}
//! ```

use crate::alerts::types::Severity;
use crate::rules::error::{RuleError, RuleResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use strum_macros::{Display, EnumString};

/// What a rule does when evaluated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleAction {
    /// Active rule; each match raises an alert
    #[default]
    Alert,
    /// Kept in the file and self-tested, never matched
    Disabled,
}

/// Example lines a rule must and must not match
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleFixtures {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

impl RuleFixtures {
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub pattern: String,
    #[serde(default)]
    pub action: RuleAction,
    /// Human readable label, used as the alert subject
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub tests: RuleFixtures,
}

impl RuleDefinition {
    pub fn new<P: Into<String>>(pattern: P) -> Self {
        Self {
            pattern: pattern.into(),
            action: RuleAction::default(),
            metadata: String::new(),
            severity: Severity::default(),
            tests: RuleFixtures::default(),
        }
    }

    pub fn with_metadata<M: Into<String>>(mut self, metadata: M) -> Self {
        self.metadata = metadata.into();
        self
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_fixtures(mut self, positive: &[&str], negative: &[&str]) -> Self {
        self.tests = RuleFixtures {
            positive: positive.iter().map(|s| s.to_string()).collect(),
            negative: negative.iter().map(|s| s.to_string()).collect(),
        };
        self
    }
}

/// A named rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub definition: RuleDefinition,
}

impl Rule {
    /// Alert subject for this rule: the metadata label, or the id when unlabelled
    pub fn label(&self) -> &str {
        if self.definition.metadata.trim().is_empty() {
            &self.id
        } else {
            &self.definition.metadata
        }
    }
}

#[derive(Deserialize)]
struct RuleEntry {
    id: String,
    #[serde(flatten)]
    definition: RuleDefinition,
}

/// Ordered collection of rules
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, rejecting duplicate ids
    pub fn new(origin: &str, rules: Vec<Rule>) -> RuleResult<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleError::DuplicateRule {
                    origin: origin.to_string(),
                    rule_id: rule.id.clone(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// Parse a JSON rule set document. `origin` names the source in errors.
    pub fn from_json_str(text: &str, origin: &str) -> RuleResult<Self> {
        let parse_err = |source| RuleError::Parse {
            origin: origin.to_string(),
            source,
        };

        let rules = match serde_json::from_str::<Value>(text).map_err(parse_err)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<RuleEntry>(item).map(|entry| Rule {
                        id: entry.id,
                        definition: entry.definition,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(parse_err)?,
            Value::Object(map) => map
                .into_iter()
                .map(|(id, item)| {
                    serde_json::from_value::<RuleDefinition>(item)
                        .map(|definition| Rule { id, definition })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(parse_err)?,
            _ => {
                return Err(RuleError::InvalidDocument {
                    origin: origin.to_string(),
                })
            }
        };

        Self::new(origin, rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
