/// Record store connection and table creation
pub mod database;

/// Operator settings loading from stockroom.toml
pub mod settings;
