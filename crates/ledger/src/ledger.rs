use crate::error::{ErrorKind, Result};
use crate::executor::{Assignment, Reporter};
use crate::{ExecutorHandle, Registration};
use exn::OptionExt;
use sesame_store::{NewRun, Progress, Repository, Run, Session, Target, Wordlist};
use tracing::instrument;

/// The run lifecycle core.
///
/// Creates runs, records their progress, and tells a freshly started process
/// which runs were left unfinished. It never resumes anything on its own:
/// [`recover_unfinished`](Self::recover_unfinished) only reports, and it is up
/// to the caller whether to [`resume`](Self::resume) what it finds.
#[derive(Clone)]
pub struct Ledger {
    repo: Repository,
    executor: ExecutorHandle,
}
impl Ledger {
    pub fn new(repo: Repository, executor: ExecutorHandle) -> Self {
        Self { repo, executor }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a capture target by name.
    ///
    /// Safe to call every time a target is encountered: if the name is already
    /// known, the existing target is returned untouched.
    #[instrument(skip(self, name, bssid), fields(name = name.as_ref()))]
    pub async fn register_target(
        &self,
        name: impl AsRef<str>,
        bssid: impl AsRef<str>,
    ) -> Result<Registration<Target>> {
        let name = name.as_ref();
        if let Some(target) = self.repo.insert_target(name, bssid).await.map_err(ErrorKind::store)? {
            tracing::info!(id = target.id, "Target registered");
            return Ok(Registration::Created(target));
        }
        tracing::info!("Target already exists, ignoring");
        let existing = self.repo.get_target_by_name(name).await.map_err(ErrorKind::store)?;
        // Targets are never deleted by the ledger, so the conflicting row is still there.
        Ok(Registration::Existing(existing.ok_or_raise(|| ErrorKind::Store)?))
    }

    /// Register a wordlist by name. Same rules as
    /// [`register_target`](Self::register_target).
    #[instrument(skip(self, name, size), fields(name = name.as_ref()))]
    pub async fn register_wordlist(
        &self,
        name: impl AsRef<str>,
        size: impl AsRef<str>,
        avg_run: u64,
    ) -> Result<Registration<Wordlist>> {
        let name = name.as_ref();
        if let Some(wordlist) = self.repo.insert_wordlist(name, size, avg_run).await.map_err(ErrorKind::store)? {
            tracing::info!(id = wordlist.id, "Wordlist registered");
            return Ok(Registration::Created(wordlist));
        }
        tracing::info!("Wordlist already exists, ignoring");
        let existing = self.repo.get_wordlist_by_name(name).await.map_err(ErrorKind::store)?;
        Ok(Registration::Existing(existing.ok_or_raise(|| ErrorKind::Store)?))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Record a new `NotStarted` run and hand it to the executor.
    ///
    /// The run is committed before the executor is involved. If the executor
    /// then fails to begin, the error is returned but the run stays recorded
    /// as `NotStarted`, and will be surfaced by the next recovery pass.
    #[instrument(skip(self, session), fields(session))]
    pub async fn start_run(&self, target_id: i64, wordlist_id: i64, session: impl Into<Session>) -> Result<Run> {
        let session = session.into();
        tracing::Span::current().record("session", session.as_str());
        let target = self.target(target_id).await?;
        let wordlist = self.wordlist(wordlist_id).await?;
        let run = self
            .repo
            .insert_run(&NewRun::new(session, target.id, wordlist.id))
            .await
            .map_err(ErrorKind::store)?;
        tracing::info!(target = %target.name, wordlist = %wordlist.name, "Run recorded");
        self.offer(Assignment { target, wordlist, run: run.clone() }).await?;
        Ok(run)
    }

    /// Overwrite a run's result, elapsed time and status.
    ///
    /// This is the only way a run changes after creation. Transitions are not
    /// validated; the executor is trusted to only ever move forward.
    pub async fn record_progress(&self, session: &Session, progress: Progress) -> Result<()> {
        self.reporter(session.clone()).report(progress).await
    }

    /// Every run that has not reached `Done`, oldest first.
    ///
    /// Called once at startup. Nothing is resumed: deciding whether to
    /// restart, re-queue or abandon each run is the caller's business.
    #[instrument(skip(self))]
    pub async fn recover_unfinished(&self) -> Result<Vec<Run>> {
        let runs = self.repo.list_unfinished_runs().await.map_err(ErrorKind::store)?;
        tracing::info!(count = runs.len(), "Recovered unfinished runs");
        Ok(runs)
    }

    /// Offer an unfinished run to the executor again.
    ///
    /// Only ever happens on the caller's request. Runs that are already `Done`
    /// are refused with [`ErrorKind::AlreadyDone`].
    #[instrument(skip(self, session), fields(session = %session))]
    pub async fn resume(&self, session: &Session) -> Result<Run> {
        let run = self.run(session).await?;
        if run.status.is_terminal() {
            exn::bail!(ErrorKind::AlreadyDone(session.to_string()));
        }
        let target = self.target(run.target_id).await?;
        let wordlist = self.wordlist(run.wordlist_id).await?;
        tracing::info!(status = %run.status, elapsed = run.elapsed_time.as_secs(), "Resuming run");
        self.offer(Assignment { target, wordlist, run: run.clone() }).await?;
        Ok(run)
    }

    /// Progress callback for one run, as handed to the executor.
    pub fn reporter(&self, session: impl Into<Session>) -> Reporter {
        Reporter::new(self.repo.clone(), session.into())
    }

    async fn offer(&self, assignment: Assignment) -> Result<()> {
        let reporter = self.reporter(assignment.session().clone());
        let session = assignment.session().clone();
        if let Err(err) = self.executor.begin(assignment, reporter).await {
            tracing::warn!(executor = self.executor.name(), session = %session, "Executor failed to begin run");
            return Err(err);
        }
        tracing::debug!(executor = self.executor.name(), session = %session, "Run handed to executor");
        Ok(())
    }

    // =========================================================================
    // Reading
    // =========================================================================

    pub async fn target(&self, id: i64) -> Result<Target> {
        let target = self.repo.get_target(id).await.map_err(ErrorKind::store)?;
        target.ok_or_raise(|| ErrorKind::TargetNotFound(id))
    }

    pub async fn wordlist(&self, id: i64) -> Result<Wordlist> {
        let wordlist = self.repo.get_wordlist(id).await.map_err(ErrorKind::store)?;
        wordlist.ok_or_raise(|| ErrorKind::WordlistNotFound(id))
    }

    pub async fn run(&self, session: &Session) -> Result<Run> {
        let run = self.repo.get_run(session).await.map_err(ErrorKind::store)?;
        run.ok_or_raise(|| ErrorKind::RunNotFound(session.to_string()))
    }

    pub async fn targets(&self) -> Result<Vec<Target>> {
        self.repo.list_targets().await.map_err(ErrorKind::store)
    }

    pub async fn wordlists(&self) -> Result<Vec<Wordlist>> {
        self.repo.list_wordlists().await.map_err(ErrorKind::store)
    }

    pub async fn runs_for_target(&self, target_id: i64) -> Result<Vec<Run>> {
        self.repo.list_runs_for_target(target_id).await.map_err(ErrorKind::store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MockExecutor;
    use rstest::rstest;
    use sesame_store::{Database, RunStatus};
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        db: Database,
        executor: Arc<MockExecutor>,
        ledger: Ledger,
    }

    async fn harness_with(executor: MockExecutor) -> Harness {
        let db = Database::connect_in_memory().await.unwrap();
        let executor = Arc::new(executor);
        let ledger = Ledger::new(db.repository(), executor.clone());
        Harness { db, executor, ledger }
    }

    async fn harness() -> Harness {
        harness_with(MockExecutor::default()).await
    }

    async fn seed(ledger: &Ledger) -> (Target, Wordlist) {
        let target = ledger.register_target("home.cap", "00:11:22:33:44:55").await.unwrap().into_inner();
        let wordlist = ledger.register_wordlist("rockyou.txt", "14M", 3600).await.unwrap().into_inner();
        (target, wordlist)
    }

    #[tokio::test]
    async fn test_register_target_twice() {
        let h = harness().await;
        let first = h.ledger.register_target("home.cap", "00:11:22:33:44:55").await.unwrap();
        let second = h.ledger.register_target("home.cap", "ff:ff:ff:ff:ff:ff").await.unwrap();
        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(first.get(), second.get());
        assert_eq!(h.ledger.targets().await.unwrap().len(), 1);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_register_wordlist_twice() {
        let h = harness().await;
        h.ledger.register_wordlist("rockyou.txt", "14M", 3600).await.unwrap();
        let second = h.ledger.register_wordlist("rockyou.txt", "14M", 3600).await.unwrap();
        assert!(matches!(second, Registration::Existing(_)));
        assert_eq!(h.ledger.wordlists().await.unwrap().len(), 1);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_start_then_recover() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        let unfinished = h.ledger.recover_unfinished().await.unwrap();
        assert_eq!(unfinished.len(), 1);
        assert_eq!(unfinished[0].status, RunStatus::NotStarted);
        assert_eq!(unfinished[0].session, Session::from("s1"));
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_start_hands_off_to_executor() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        let assignments = h.executor.assignments().await;
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].target, target);
        assert_eq!(assignments[0].wordlist, wordlist);
        assert!(!assignments[0].is_resumption());
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_done_is_no_longer_recovered() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        h.ledger
            .record_progress(&"s1".into(), Progress::done("cracked:pw123", Duration::from_secs(42)))
            .await
            .unwrap();
        assert!(h.ledger.recover_unfinished().await.unwrap().is_empty());
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_progress_for_unknown_session() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        let repo = h.db.repository();
        let before = repo.count_runs().await.unwrap();
        let err = h
            .ledger
            .record_progress(&"ghost".into(), Progress::running(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::RunNotFound(session) if session == "ghost"));
        assert_eq!(repo.count_runs().await.unwrap(), before);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_executor_driven_lifecycle() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        let session = Session::from("s1");
        h.ledger.start_run(target.id, wordlist.id, session.clone()).await.unwrap();
        h.executor.drive(&session, Progress::running(Duration::from_secs(10))).await.unwrap();
        assert_eq!(h.ledger.run(&session).await.unwrap().status, RunStatus::Running);
        h.executor.drive(&session, Progress::paused(Duration::from_secs(20))).await.unwrap();
        let paused = h.ledger.recover_unfinished().await.unwrap();
        assert_eq!(paused[0].status, RunStatus::Paused);
        assert_eq!(paused[0].elapsed_time, Duration::from_secs(20));
        h.executor.drive(&session, Progress::done("hunter2", Duration::from_secs(30))).await.unwrap();
        let run = h.ledger.run(&session).await.unwrap();
        assert_eq!(run.status, RunStatus::Done);
        assert_eq!(run.result, "hunter2");
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_round_trip_keeps_start_time() {
        let h = harness().await;
        let repo = h.db.repository();
        let session = Session::from("s1");
        let started = time::UtcDateTime::from_unix_timestamp(1000).unwrap();
        repo.insert_run(&NewRun::new(session.clone(), 1, 1).started_at(started)).await.unwrap();
        h.ledger.record_progress(&session, Progress::running(Duration::from_secs(10))).await.unwrap();
        h.ledger.record_progress(&session, Progress::done("X", Duration::from_secs(55))).await.unwrap();
        let run = h.ledger.run(&session).await.unwrap();
        assert_eq!(run.status, RunStatus::Done);
        assert_eq!(run.result, "X");
        assert_eq!(run.elapsed_time, Duration::from_secs(55));
        assert_eq!(run.started_at.unix_timestamp(), 1000);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_start_unknown_target_records_nothing() {
        let h = harness().await;
        let (_, wordlist) = seed(&h.ledger).await;
        let err = h.ledger.start_run(999, wordlist.id, "s1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::TargetNotFound(999)));
        assert_eq!(h.db.repository().count_runs().await.unwrap(), 0);
        assert!(h.executor.assignments().await.is_empty());
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_duplicate_session_is_refused() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        let err = h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateSession(_)));
        assert_eq!(h.executor.assignments().await.len(), 1);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_failed_executor_leaves_run_recoverable() {
        let h = harness_with(MockExecutor::failing()).await;
        let (target, wordlist) = seed(&h.ledger).await;
        let err = h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Executor));
        let unfinished = h.ledger.recover_unfinished().await.unwrap();
        assert_eq!(unfinished.len(), 1);
        assert_eq!(unfinished[0].status, RunStatus::NotStarted);
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_resume_reoffers_with_progress() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        let session = Session::from("s1");
        h.ledger.start_run(target.id, wordlist.id, session.clone()).await.unwrap();
        h.executor.drive(&session, Progress::paused(Duration::from_secs(90))).await.unwrap();
        for run in h.ledger.recover_unfinished().await.unwrap() {
            h.ledger.resume(&run.session).await.unwrap();
        }
        let assignments = h.executor.assignments().await;
        assert_eq!(assignments.len(), 2);
        assert!(assignments[1].is_resumption());
        assert_eq!(assignments[1].run.elapsed_time, Duration::from_secs(90));
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_resume_refuses_done() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        let session = Session::from("s1");
        h.ledger.start_run(target.id, wordlist.id, session.clone()).await.unwrap();
        h.ledger.record_progress(&session, Progress::done("", Duration::from_secs(5))).await.unwrap();
        let err = h.ledger.resume(&session).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyDone(_)));
        h.db.close().await;
    }

    #[tokio::test]
    async fn test_recover_does_not_resume() {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        h.ledger.start_run(target.id, wordlist.id, "s1").await.unwrap();
        h.ledger.recover_unfinished().await.unwrap();
        assert_eq!(h.executor.assignments().await.len(), 1);
        h.db.close().await;
    }

    #[rstest]
    #[case(RunStatus::NotStarted, false)]
    #[case(RunStatus::Running, true)]
    #[case(RunStatus::Paused, true)]
    #[tokio::test]
    async fn test_resume_any_unfinished_status(#[case] status: RunStatus, #[case] resumption: bool) {
        let h = harness().await;
        let (target, wordlist) = seed(&h.ledger).await;
        let session = Session::from("s1");
        h.ledger.start_run(target.id, wordlist.id, session.clone()).await.unwrap();
        h.ledger
            .record_progress(&session, Progress::new("", Duration::from_secs(30), status))
            .await
            .unwrap();
        let run = h.ledger.resume(&session).await.unwrap();
        assert_eq!(run.status, status);
        let assignments = h.executor.assignments().await;
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[1].is_resumption(), resumption);
        h.db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_target_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("ledger.db")).await.unwrap();
        let ledger = Ledger::new(db.repository(), Arc::new(MockExecutor::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.register_target("contested", "00:00:00:00:00:00").await })
            })
            .collect();
        let mut registrations = Vec::new();
        for handle in handles {
            registrations.push(handle.await.unwrap().unwrap());
        }
        assert_eq!(registrations.iter().filter(|r| r.is_created()).count(), 1);
        let id = registrations[0].get().id;
        assert!(registrations.iter().all(|r| r.get().id == id));
        assert_eq!(ledger.targets().await.unwrap().len(), 1);
        db.close().await;
    }
}
