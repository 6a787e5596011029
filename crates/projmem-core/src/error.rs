//! Error types for projmem-core

use thiserror::Error;

/// Result type alias using projmem-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for project memory operations
#[derive(Error, Debug)]
pub enum Error {
    /// The store could not be reached or refused the credentials.
    /// The cause stays in the source chain; `Display` does not repeat it.
    #[error("Database connection failed")]
    Connection(#[source] sqlx::Error),

    /// A statement failed after the connection was established.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// An update was requested with no fields to change.
    #[error("Nothing to update")]
    NoUpdateFields,
}
