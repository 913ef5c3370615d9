//! CLI module containing argument parsing

pub mod api;
pub(crate) mod args;

#[cfg(test)]
mod tests;
