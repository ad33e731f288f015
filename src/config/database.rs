//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity`, so the columns,
//! defaults, unique keys and foreign keys (with their `ON DELETE` actions) always
//! match the entity definitions in [`crate::entities`].

use crate::entities::{EquipmentType, Expense, Invoice, Organization, Project, User};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, EntityName, EntityTrait,
    Schema,
};
use tracing::{debug, info, instrument};

/// Used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/equipment_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens `database_url`, creating the directory of a file-backed `SQLite` database first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(database_url)?;
    connect(database_url).await
}

/// Creates the directory holding a file-backed `SQLite` database.
///
/// `SQLite` creates the database file on demand (`mode=rwc`) but not its parent
/// directory. Non-`SQLite` and in-memory URLs are left alone.
pub fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") || path == "memory" {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
            debug!("Ensured database directory {}", parent.display());
        }
    }
    Ok(())
}

/// Connects to `database_url` and makes sure foreign keys are enforced.
///
/// `SQLite` only honors `ON DELETE CASCADE` / `NO ACTION` with the
/// `foreign_keys` pragma switched on.
#[instrument]
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    let db = Database::connect(database_url).await?;

    if db.get_database_backend() == DatabaseBackend::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    Ok(db)
}

/// Creates all tables, parents before children, skipping any that already exist.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Organization).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Project).await?;
    create_table(db, &schema, EquipmentType).await?;
    create_table(db, &schema, Invoice).await?;
    create_table(db, &schema, Expense).await?;

    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    debug!(table = entity.table_name(), "Creating table");
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}
