pub mod alerts;
pub mod app;
pub mod core;
pub mod plugin;
pub mod rules;
pub mod watcher;
