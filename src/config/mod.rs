/// Database configuration and connection management
pub mod database;

/// Student directory seed and staff roles from config.toml
pub mod hostel;

/// Environment loading and log filter setup
pub mod logging;
