//! In-memory executor for testing.

use super::{Assignment, Executor, Reporter};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use sesame_store::{Progress, Session};
use tokio::sync::Mutex;

/// Executor that does no work at all.
///
/// Every assignment is remembered together with its [`Reporter`], so a test
/// can play the part of the external process and push progress by hand.
pub struct MockExecutor {
    name: String,
    fail: bool,
    accepted: Mutex<Vec<(Assignment, Reporter)>>,
}

impl MockExecutor {
    /// An executor whose `begin` always fails, as if the cracking tool were
    /// missing.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// All assignments accepted so far, oldest first.
    pub async fn assignments(&self) -> Vec<Assignment> {
        self.accepted.lock().await.iter().map(|(assignment, _)| assignment.clone()).collect()
    }

    /// Reporter of the most recent assignment for a session.
    pub async fn reporter(&self, session: &Session) -> Option<Reporter> {
        self.accepted
            .lock()
            .await
            .iter()
            .rev()
            .find(|(assignment, _)| assignment.session() == session)
            .map(|(_, reporter)| reporter.clone())
    }

    /// Report progress as if the external process had done so.
    ///
    /// Panics if the session was never assigned. If test setup is wrong, then
    /// test should not pass.
    pub async fn drive(&self, session: &Session, progress: Progress) -> Result<()> {
        let Some(reporter) = self.reporter(session).await else {
            panic!("MockExecutor::drive: session {session} was never assigned");
        };
        reporter.report(progress).await
    }
}
impl Default for MockExecutor {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            fail: false,
            accepted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Executor for MockExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn begin(&self, assignment: Assignment, reporter: Reporter) -> Result<()> {
        if self.fail {
            exn::bail!(ErrorKind::Executor);
        }
        self.accepted.lock().await.push((assignment, reporter));
        Ok(())
    }
}
