//! John Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A John the Ripper error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for John the Ripper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("john the ripper not detected on your system")]
    JohnNotFound,
    /// The configured binary path does not point at a file.
    #[display("john binary not found: {}", _0.display())]
    BinaryNotFound(#[error(not(source))] PathBuf),
    /// A target, wordlist or session name that is not a plain file name.
    #[display("not a plain file name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    #[display("capture file not found: {}", _0.display())]
    CaptureNotFound(#[error(not(source))] PathBuf),
    #[display("wordlist not found: {}", _0.display())]
    WordlistNotFound(#[error(not(source))] PathBuf),
    /// The session directory could not be created.
    #[display("session directory unavailable: {}", _0.display())]
    SessionDirectory(#[error(not(source))] PathBuf),
    /// The john process could not be started.
    Spawn,
    /// John exited with a non-zero exit code while showing cracked passwords.
    #[display("john exited with code: {_0}")]
    JohnFailed(#[error(not(source))] i32),
    /// Progress could not be written to the ledger.
    Report,
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Spawn | Self::Report | Self::Io)
    }
}
