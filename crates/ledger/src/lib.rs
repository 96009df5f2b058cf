//! Run lifecycle ledger.
//!
//! This crate is the logic layer on top of [`sesame_store`]: it registers
//! targets and wordlists idempotently, records runs and their progress, and
//! surfaces unfinished runs after a restart.
//!
//! The cracking itself is delegated to an [`Executor`](executor::Executor),
//! which receives an [`Assignment`](executor::Assignment) and reports back via
//! a [`Reporter`](executor::Reporter). The ledger spawns no background work of
//! its own.
//!
//! ```text
//! NotStarted --(executor starts)--> Running
//! Running    --(final result)-----> Done
//! Running    --(interrupted)------> Paused
//! Paused     --(resumed)----------> Running
//! ```

pub mod error;
pub mod executor;
mod ledger;

pub use crate::ledger::Ledger;
use std::sync::Arc;

pub type ExecutorHandle = Arc<dyn executor::Executor + Send + Sync>;

/// Outcome of an idempotent registration. Both variants carry the canonical
/// stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration<T> {
    /// No row with this name existed; one was created.
    Created(T),
    /// A row with this name already existed and was left untouched.
    Existing(T),
}
impl<T> Registration<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Created(inner) | Self::Existing(inner) => inner,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(inner) | Self::Existing(inner) => inner,
        }
    }
}
