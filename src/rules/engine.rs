//! Rule engine contract and the regex implementation
//!
//! Engines report matches through a synchronous callback so callers decide what a
//! match means. Lines are walked in the order given and, for each line, rules are
//! tried in definition order.

use crate::rules::error::{RuleError, RuleResult};
use crate::rules::types::{Rule, RuleAction, RuleSet};
use crate::watcher::types::PatchEvent;
use log::trace;
use regex::Regex;

/// One offending line reported by an engine
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub rule: &'a Rule,
    pub patch: &'a PatchEvent,
    /// All candidate lines passed to the engine
    pub lines: &'a [String],
    pub offending_line: &'a str,
}

/// Outcome of validating a rule set against its own fixtures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestReport {
    pub success: bool,
    pub report: String,
}

pub trait RuleEngine: Send + Sync {
    /// Evaluate every active rule against every line, calling `on_match` per hit
    fn match_lines(
        &self,
        lines: &[String],
        context: &PatchEvent,
        on_match: &mut dyn FnMut(MatchResult<'_>),
    );

    /// Check every rule against its positive and negative fixtures
    fn self_test(&self) -> SelfTestReport;
}

#[derive(Debug)]
struct CompiledRule {
    rule: Rule,
    regex: Regex,
}

/// Engine evaluating each rule as an unanchored regex search
#[derive(Debug)]
pub struct RegexRuleEngine {
    rules: Vec<CompiledRule>,
}

impl RegexRuleEngine {
    /// Compile every rule, failing on the first invalid pattern
    pub fn new(rule_set: RuleSet) -> RuleResult<Self> {
        let rules = rule_set
            .rules()
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.definition.pattern).map_err(|source| {
                    RuleError::InvalidPattern {
                        rule_id: rule.id.clone(),
                        pattern: rule.definition.pattern.clone(),
                        source,
                    }
                })?;
                Ok(CompiledRule {
                    rule: rule.clone(),
                    regex,
                })
            })
            .collect::<RuleResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn active_rules(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules
            .iter()
            .filter(|compiled| compiled.rule.definition.action != RuleAction::Disabled)
    }
}

impl RuleEngine for RegexRuleEngine {
    fn match_lines(
        &self,
        lines: &[String],
        context: &PatchEvent,
        on_match: &mut dyn FnMut(MatchResult<'_>),
    ) {
        trace!(
            "matching {} lines of {} against {} rules",
            lines.len(),
            context.filename,
            self.rules.len()
        );

        for line in lines {
            for compiled in self.active_rules() {
                if compiled.regex.is_match(line) {
                    on_match(MatchResult {
                        rule: &compiled.rule,
                        patch: context,
                        lines,
                        offending_line: line,
                    });
                }
            }
        }
    }

    fn self_test(&self) -> SelfTestReport {
        let mut failures = Vec::new();
        let mut checked = 0usize;

        for compiled in &self.rules {
            let fixtures = &compiled.rule.definition.tests;
            for example in &fixtures.positive {
                checked += 1;
                if !compiled.regex.is_match(example) {
                    failures.push(format!(
                        "rule '{}': expected match but got none: {:?}",
                        compiled.rule.id, example
                    ));
                }
            }
            for example in &fixtures.negative {
                checked += 1;
                if compiled.regex.is_match(example) {
                    failures.push(format!(
                        "rule '{}': expected no match but matched: {:?}",
                        compiled.rule.id, example
                    ));
                }
            }
        }

        let success = failures.is_empty();
        let summary = format!(
            "{} rules, {} fixtures checked, {} failures",
            self.rules.len(),
            checked,
            failures.len()
        );
        failures.push(summary);

        SelfTestReport {
            success,
            report: failures.join("\n"),
        }
    }
}
