//! Core services and infrastructure

pub mod error_handling;
pub mod html;
pub mod logging;
pub mod version;
