//! Errors shared by every relational repository port.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Persistence errors raised by repository adapters.
    pub enum PersistenceError {
        /// No connection could be checked out of the pool.
        Connection { message: String } => "database connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "database query failed: {message}",
        /// A unique constraint rejected the write.
        UniqueViolation { constraint: String } =>
            "unique constraint {constraint} rejected the write",
        /// A foreign key constraint rejected the write.
        ForeignKeyViolation { constraint: String } =>
            "foreign key constraint {constraint} rejected the write",
    }
}

impl From<PersistenceError> for Error {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::Connection { message } => {
                Self::service_unavailable(format!("database unavailable: {message}"))
            }
            PersistenceError::Query { message } => {
                Self::internal(format!("database error: {message}"))
            }
            PersistenceError::UniqueViolation { constraint } => {
                Self::conflict(format!("record already exists ({constraint})"))
            }
            PersistenceError::ForeignKeyViolation { constraint } => {
                Self::invalid_request(format!("referenced record does not exist ({constraint})"))
            }
        }
    }
}
