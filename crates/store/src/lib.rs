//! SQLite ledger database for password-recovery runs.
//!
//! This crate owns the durable record of everything the cracking pipeline has
//! been asked to do, so that a restarted process can find out what was left
//! unfinished.
//!
//! # Architecture
//! The ledger stores three entity types:
//! - **Targets**: capture files to attack, unique by name.
//! - **Wordlists**: candidate-password sources, unique by name.
//! - **Runs**: one attempt at one target with one wordlist, keyed by an opaque
//!   session token. A run is never deleted; it only moves through
//!   `NotStarted`, `Running`, `Paused` and finally `Done`.
//!
//! Name uniqueness and session uniqueness are both enforced by the schema, not
//! by check-then-insert logic, so they hold under concurrent writers.

mod db;
pub mod error;
mod models;
mod repo;
mod types;

pub use crate::db::Database;
pub use crate::repo::{NamedTable, Repository};
pub use crate::types::{NewRun, Progress, Run, RunStatus, Session, Target, UnknownStatus, Wordlist};
