//! Unified error type for the ledger.
//!
//! Constraint failures raised by the database are classified when a [`DbErr`]
//! is converted, so callers can match on [`Error::UniqueViolation`],
//! [`Error::ForeignKeyViolation`] and [`Error::NotNullViolation`] regardless of
//! the backend that produced them.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by ledger operations
#[derive(Debug, Error)]
pub enum Error {
    /// Seed file or environment could not be read
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong, including the offending path or value
        message: String,
    },

    /// Input rejected before reaching the database
    #[error("Validation failed: {message}")]
    Validation {
        /// Which field failed and why
        message: String,
    },

    /// A negative amount was supplied
    #[error("Invalid amount: {amount} (amounts are non-negative integer cents)")]
    InvalidAmount {
        /// The rejected amount in cents
        amount: i64,
    },

    /// No row with this id
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Human-readable entity name, e.g. `"project"`
        entity: &'static str,
        /// The id that was looked up
        id: i32,
    },

    /// Invoice project and equipment type belong to different tenants
    #[error(
        "Project belongs to organization {project_organization_id} but equipment type belongs to organization {equipment_organization_id}"
    )]
    TenantMismatch {
        /// Tenant of the invoice's project
        project_organization_id: i32,
        /// Tenant of the invoice's equipment type
        equipment_organization_id: i32,
    },

    /// Duplicate value in a unique column
    #[error("Unique constraint violated: {message}")]
    UniqueViolation {
        /// Database message naming the column
        message: String,
    },

    /// Missing parent row, or a delete blocked by child rows
    #[error("Foreign key constraint violated: {message}")]
    ForeignKeyViolation {
        /// Database message
        message: String,
    },

    /// Required column left unset
    #[error("Not-null constraint violated: {message}")]
    NotNullViolation {
        /// Database message naming the column
        message: String,
    },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::UniqueViolation { message };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::ForeignKeyViolation { message };
            }
            _ => {}
        }

        // SQLite: "NOT NULL constraint failed", Postgres: "null value in column ... violates not-null"
        let message = err.to_string();
        if message.contains("NOT NULL constraint failed") || message.contains("violates not-null")
        {
            Self::NotNullViolation { message }
        } else if message.contains("UNIQUE constraint failed") {
            Self::UniqueViolation { message }
        } else if message.contains("FOREIGN KEY constraint failed") {
            Self::ForeignKeyViolation { message }
        } else {
            Self::Database(err)
        }
    }
}

impl Error {
    /// True for any failure the database raised while enforcing a constraint.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation { .. }
                | Self::ForeignKeyViolation { .. }
                | Self::NotNullViolation { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
