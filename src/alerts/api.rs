//! Public API for alerts and deduplication

use std::sync::{Arc, LazyLock};

pub use crate::alerts::dedup::{
    AlertDeduplicator, AlertIdentity, DedupStrategy, LastAlertDedup, LruDedup, NoDedup,
};
pub use crate::alerts::dispatcher::{AlertDispatcher, LogDispatcher};
pub use crate::alerts::error::{AlertError, AlertResult};
pub use crate::alerts::types::{Alert, Severity};

/// Process-wide last-alert marker
static LAST_ALERT: LazyLock<Arc<LastAlertDedup>> = LazyLock::new(|| {
    log::trace!("Initializing process-wide last alert marker");
    Arc::new(LastAlertDedup::new())
});

/// The last-alert marker shared by every plugin in this process
///
/// Plugins built from settings with the `last` strategy share this instance, so an
/// alert raised by one plugin suppresses an identical immediate repeat from another.
pub fn shared_last_alert() -> Arc<LastAlertDedup> {
    Arc::clone(&LAST_ALERT)
}

/// Build the deduplicator for a configured strategy
pub fn deduplicator_for(strategy: DedupStrategy, capacity: usize) -> Arc<dyn AlertDeduplicator> {
    match strategy {
        DedupStrategy::Last => shared_last_alert(),
        DedupStrategy::Lru => Arc::new(LruDedup::new(capacity)),
        DedupStrategy::Disabled => Arc::new(NoDedup),
    }
}
