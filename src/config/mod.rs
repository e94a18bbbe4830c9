/// Database configuration and connection management
pub mod database;

/// Costing defaults loaded from config.toml
pub mod costing;
