/// Database configuration, connection management and table creation
pub mod database;

/// Tenant seed data loaded from a TOML file
pub mod seed;
