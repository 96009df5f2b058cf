//! The boundary between the ledger and whatever actually cracks passwords.
//!
//! The ledger never drives an external process itself. It hands an
//! [`Assignment`] to an [`Executor`] together with a [`Reporter`], and the
//! executor pushes status changes back through the reporter whenever it likes.

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockExecutor;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use sesame_store::{Progress, Repository, Run, Session, Target, Wordlist};
use std::time::Duration;

/// Everything an executor needs to know to work on one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: Target,
    pub wordlist: Wordlist,
    /// The run as currently recorded. A status other than `NotStarted` means
    /// this is a resumption, and `elapsed_time` holds what has already been
    /// spent on it.
    pub run: Run,
}
impl Assignment {
    pub fn session(&self) -> &Session {
        &self.run.session
    }

    /// Whether the run has been worked on before.
    pub fn is_resumption(&self) -> bool {
        self.run.status != sesame_store::RunStatus::NotStarted
    }
}

/// Progress callback bound to exactly one run.
///
/// Every report overwrites the run's result, elapsed time and status together.
/// Reports for a session are last-write-wins, so an executor must not report
/// for the same run from two places at once.
#[derive(Debug, Clone)]
pub struct Reporter {
    repo: Repository,
    session: Session,
}
impl Reporter {
    pub(crate) fn new(repo: Repository, session: Session) -> Self {
        Self { repo, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn report(&self, progress: Progress) -> Result<()> {
        tracing::debug!(session = %self.session, status = %progress.status, elapsed = progress.elapsed_time.as_secs(), "Run progress");
        self.repo.update_run(&self.session, &progress).await.map_err(ErrorKind::store)
    }

    pub async fn running(&self, elapsed: Duration) -> Result<()> {
        self.report(Progress::running(elapsed)).await
    }

    pub async fn paused(&self, elapsed: Duration) -> Result<()> {
        self.report(Progress::paused(elapsed)).await
    }

    pub async fn done(&self, result: impl Into<String>, elapsed: Duration) -> Result<()> {
        self.report(Progress::done(result, elapsed)).await
    }
}

/// Capability to perform the actual cracking work.
///
/// [`begin`](Self::begin) must return promptly: long-running work belongs in
/// the background, reporting through the given [`Reporter`]. An executor is
/// expected to eventually drive each run to `Done`, or leave it in a resumable
/// state (`Running` or `Paused`) for the next recovery pass.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Name of the executor, used for logging only.
    fn name(&self) -> &str;

    /// Start (or resume) work on an assignment.
    ///
    /// Returning an error means no work was started; the run is left as it
    /// was and will be surfaced again on recovery. Implementations should
    /// raise [`ErrorKind::Executor`] on top of their own error tree.
    async fn begin(&self, assignment: Assignment, reporter: Reporter) -> Result<()>;
}
