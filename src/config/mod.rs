/// Store connection and table creation
pub mod database;

/// Fixture collections loaded from TOML
pub mod fixtures;

/// Runtime settings from environment variables
pub mod settings;

pub use settings::Settings;
