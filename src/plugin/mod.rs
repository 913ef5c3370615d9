//! Plugin System Module
//!
//! The [`traits::CommitPlugin`] hooks the host calls, and the scanning plugin that
//! turns rule matches in patched files into deduplicated alerts.

pub(crate) mod error;
pub(crate) mod patterns;
pub(crate) mod scanning;
pub(crate) mod settings;
pub(crate) mod traits;
pub(crate) mod types;

pub mod api;

#[cfg(test)]
mod tests;
