//! Ledger Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use sesame_store::error::{Error as StoreError, ErrorKind as StoreErrorKind};

/// A ledger error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### Caller Errors
/// - [`ErrorKind::TargetNotFound`], [`ErrorKind::WordlistNotFound`]: register first.
/// - [`ErrorKind::RunNotFound`]: progress was reported before the run was started.
/// - [`ErrorKind::DuplicateSession`]: session tokens must be unique per attempt.
/// - [`ErrorKind::AlreadyDone`]: finished runs cannot be resumed.
///
/// ### Dependency Errors
/// - [`ErrorKind::Store`]
/// - [`ErrorKind::Executor`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Reading or writing the ledger database failed.
    #[display("ledger storage error")]
    Store,
    /// The executor refused or failed to begin work.
    #[display("executor error")]
    Executor,
    #[display("target not found: {_0}")]
    TargetNotFound(#[error(not(source))] i64),
    #[display("wordlist not found: {_0}")]
    WordlistNotFound(#[error(not(source))] i64),
    #[display("run not found: {_0}")]
    RunNotFound(#[error(not(source))] String),
    #[display("duplicate run session: {_0}")]
    DuplicateSession(#[error(not(source))] String),
    #[display("run already done: {_0}")]
    AlreadyDone(#[error(not(source))] String),
}

impl ErrorKind {
    /// Convert a store error into a ledger error, keeping the store's frame as
    /// a child in the error tree. Conditions the caller can act on keep their
    /// identity; everything else is a plain storage failure.
    #[track_caller]
    pub fn store(err: StoreError) -> Error {
        let kind = match &*err {
            StoreErrorKind::RunNotFound(session) => Self::RunNotFound(session.clone()),
            StoreErrorKind::DuplicateSession(session) => Self::DuplicateSession(session.clone()),
            StoreErrorKind::TargetNotFound(id) => Self::TargetNotFound(*id),
            StoreErrorKind::WordlistNotFound(id) => Self::WordlistNotFound(*id),
            _ => Self::Store,
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store | Self::Executor)
    }
}
