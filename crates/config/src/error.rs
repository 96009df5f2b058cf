//! Config Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No home directory to derive default locations from; every path must
    /// then be configured explicitly.
    #[display("could not determine a home directory for default paths")]
    NoHomeDirectory,
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Only TOML, YAML and JSON files are understood.
    #[display("unsupported config file format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A layer could not be parsed, or the merged result has the wrong shape.
    #[display("invalid configuration")]
    Load,
    #[display("invalid configuration value: {_0}")]
    Invalid(#[error(not(source))] &'static str),
}
