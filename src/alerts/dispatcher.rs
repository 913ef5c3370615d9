//! Alert dispatcher contract
//!
//! Delivery transports live outside this crate. [`LogDispatcher`] writes alerts to
//! the log so the plugin is usable without one.

use crate::alerts::error::{AlertError, AlertResult};
use crate::alerts::types::{Alert, Severity};
use log::{info, warn};

#[async_trait::async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// Deliver `alert` to `recipients`. Fire and forget from the caller's side:
    /// no retry is attempted on failure.
    async fn send(&self, alert: Alert, recipients: &[String]) -> AlertResult<()>;
}

/// Dispatcher that logs each alert instead of delivering it
#[derive(Debug, Default, Clone)]
pub struct LogDispatcher;

impl LogDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AlertDispatcher for LogDispatcher {
    async fn send(&self, alert: Alert, recipients: &[String]) -> AlertResult<()> {
        if recipients.is_empty() {
            return Err(AlertError::NoRecipients {
                subject: alert.subject,
            });
        }

        let to = recipients.join(", ");
        if alert.severity >= Severity::High {
            warn!("{} -> {}", alert.subject, to);
        } else {
            info!("{} -> {}", alert.subject, to);
        }
        for line in alert.message.lines() {
            info!("  {}", line);
        }
        Ok(())
    }
}
