//! CLI argument parsing tests
