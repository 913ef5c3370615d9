//! Rule Set Error Types

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Cannot read rule set '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rule set '{origin}' is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rule set '{origin}' must be a JSON array or object of rules")]
    InvalidDocument { origin: String },

    #[error("Rule set '{origin}' defines rule '{rule_id}' more than once")]
    DuplicateRule { origin: String, rule_id: String },

    #[error("Rule '{rule_id}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for rule set operations
pub type RuleResult<T> = Result<T, RuleError>;
