//! Alerts
//!
//! Alert payloads, the dispatcher contract and deduplication strategies.

pub(crate) mod dedup;
pub(crate) mod dispatcher;
pub(crate) mod error;
pub(crate) mod types;

pub mod api;
