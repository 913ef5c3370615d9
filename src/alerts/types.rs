//! Alert payload types

use chrono::{DateTime, Utc};
use strum_macros::{Display, EnumString};

/// Alert urgency
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    #[default]
    High,
    Critical,
}

/// Outbound notification handed to an [`AlertDispatcher`](crate::alerts::dispatcher::AlertDispatcher)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Alert {
    pub subject: String,
    /// Plain-text rendering of the alert
    pub message: String,
    /// HTML rendering; only the offending line is escaped, the commit URL and
    /// filename are inserted as given
    pub message_html: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn new<S: Into<String>>(
        subject: S,
        message: String,
        message_html: String,
        severity: Severity,
    ) -> Self {
        Self {
            subject: subject.into(),
            message,
            message_html,
            severity,
            created_at: Utc::now(),
        }
    }
}
