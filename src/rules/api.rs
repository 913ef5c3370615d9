//! Public API for the rule engine

pub use crate::rules::engine::{MatchResult, RegexRuleEngine, RuleEngine, SelfTestReport};
pub use crate::rules::error::{RuleError, RuleResult};
pub use crate::rules::loader::{PreloadedRules, ReloadPolicy, RuleEngineLoader, RuleSetLoader};
pub use crate::rules::types::{Rule, RuleAction, RuleDefinition, RuleFixtures, RuleSet};
