/// Error Module
///
/// This module defines the error types for pgq. It provides structured
/// error handling with proper error propagation and user-facing messages.
use thiserror::Error;

/// Error type covering every failure pgq reports.
///
/// The taxonomy is deliberately small:
/// - Connection and query failures from the PostgreSQL driver
/// - Standard-input read failures
/// - Result serialization failures
///
/// All variants are reported to standard error with full detail; there is
/// no retry and no partial recovery anywhere in the program.
#[derive(Error, Debug)]
pub enum PgqError {
    /// Connection or query errors from the PostgreSQL driver
    /// (unreachable host, authentication rejection, syntax errors,
    /// constraint violations, statement timeout exceeded).
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Standard-input read errors while collecting query text
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result-set serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use PgqError as the error type.
pub type Result<T> = std::result::Result<T, PgqError>;
