//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    /// The ledger database could not be opened or its schema created.
    #[display("could not open ledger database")]
    Database,
    #[display("ledger operation failed")]
    Ledger,
    #[display("john the ripper is unavailable")]
    John,
    Io,
}
