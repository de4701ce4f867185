//! Storage-layer errors and their conversion to core errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use spendguard_core::errors::{DatabaseError, Error as CoreError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database query failed: {0}")]
    Query(String),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    // Lets core errors round-trip through the writer actor unchanged.
    #[error("{0}")]
    Core(CoreError),
}

impl From<DieselError> for StorageError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => StorageError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StorageError::UniqueViolation(info.message().to_string())
            }
            other => StorageError::Query(other.to_string()),
        }
    }
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(inner) => inner,
            StorageError::NotFound => CoreError::NotFound("record".to_string()),
            StorageError::UniqueViolation(message) => CoreError::Conflict(message),
            StorageError::Query(message) | StorageError::Corrupt(message) => {
                CoreError::Database(DatabaseError::QueryFailed(message))
            }
            StorageError::Pool(message) => {
                CoreError::Database(DatabaseError::PoolCreationFailed(message))
            }
        }
    }
}
