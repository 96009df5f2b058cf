//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// In particular, a failed query is always [`ErrorKind::Database`] and is never
/// reported as an empty result.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The driver failed to execute a statement (I/O, locking, corruption).
    #[display("database error")]
    Database,
    /// The schema could not be created or upgraded. The store is unusable.
    #[display("database migration error")]
    Migration,
    /// No run is recorded under the given session token.
    #[display("run not found: {_0}")]
    RunNotFound(#[error(not(source))] String),
    /// A run with the given session token already exists.
    #[display("duplicate run session: {_0}")]
    DuplicateSession(#[error(not(source))] String),
    #[display("target not found: {_0}")]
    TargetNotFound(#[error(not(source))] i64),
    #[display("wordlist not found: {_0}")]
    WordlistNotFound(#[error(not(source))] i64),
    /// A stored value could not be converted to or from its model.
    #[display("invalid ledger data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // SQLITE_BUSY and friends surface as plain database errors.
        matches!(self, Self::Database)
    }
}
