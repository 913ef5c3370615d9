//! Rule Engine
//!
//! Rule set documents, the [`engine::RuleEngine`] contract with its regex
//! implementation, and loaders implementing the reload policy.

pub(crate) mod engine;
pub(crate) mod error;
pub(crate) mod loader;
pub(crate) mod types;

pub mod api;

#[cfg(test)]
mod tests;
