//! Alert Dispatch Error Types

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("{transport} transport failed: {message}")]
    Transport { transport: String, message: String },

    #[error("Alert '{subject}' has no recipients")]
    NoRecipients { subject: String },
}

/// Result type for alert dispatch
pub type AlertResult<T> = Result<T, AlertError>;
