//! Classification of Diesel failures shared by every repository.
//!
//! Repositories translate a [`DieselFailure`] into their own port error, so
//! the logging and constraint inspection happen once.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse outcome of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A row the operation required was absent.
    NotFound,
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    Query(String),
}

impl DieselFailure {
    /// Whether a unique violation came from the named constraint.
    pub(crate) fn is_unique_on(&self, name: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(c) } if c == name)
    }

    /// Whether a foreign key violation mentions `column` in its constraint.
    pub(crate) fn is_foreign_key_on(&self, column: &str) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation { constraint: Some(c) } if c.contains(column)
        )
    }
}

/// Inspect a Diesel error and log it at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::NotFound,
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error".into()),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ForeignKeyViolation => DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                DieselFailure::Connection("database connection error".into())
            }
            _ => DieselFailure::Query("database error".into()),
        },
        _ => DieselFailure::Query("database error".into()),
    }
}
