//! Repository for targets, wordlists and runs.
//!
//! Runs reference targets and wordlists by id, but the schema does not enforce
//! it: whoever records a run is responsible for the references being valid.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{RunRow, TargetRow, WordlistRow, elapsed_seconds};
use crate::types::{NewRun, Progress, Run, Session, Target, Wordlist};
use exn::ResultExt;
use sqlx::SqlitePool;

/// Tables whose rows are identified by a unique name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedTable {
    Targets,
    Wordlists,
}
impl NamedTable {
    fn exists_query(&self) -> &'static str {
        match self {
            Self::Targets => include_str!("../queries/target_name_exists.sql"),
            Self::Wordlists => include_str!("../queries/wordlist_name_exists.sql"),
        }
    }
}

/// Raw access to the ledger tables.
///
/// Every method returns an explicit [`Result`]: a failed query is an error,
/// never an empty list or a `false`.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a target, unless one with the same name already exists.
    ///
    /// The existence check and the insert are a single statement, so two
    /// concurrent callers registering the same name cannot both succeed.
    /// Returns `None` (and leaves the existing row untouched) on a duplicate.
    pub async fn insert_target(&self, name: impl AsRef<str>, bssid: impl AsRef<str>) -> Result<Option<Target>> {
        let row: Option<TargetRow> = sqlx::query_as(include_str!("../queries/insert_target.sql"))
            .bind(name.as_ref())
            .bind(bssid.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Target::from))
    }

    /// Insert a wordlist, unless one with the same name already exists.
    ///
    /// See [`insert_target`](Self::insert_target).
    pub async fn insert_wordlist(
        &self,
        name: impl AsRef<str>,
        size: impl AsRef<str>,
        avg_run: u64,
    ) -> Result<Option<Wordlist>> {
        let avg_run = i64::try_from(avg_run).or_raise(|| ErrorKind::InvalidData("average run"))?;
        let row: Option<WordlistRow> = sqlx::query_as(include_str!("../queries/insert_wordlist.sql"))
            .bind(name.as_ref())
            .bind(size.as_ref())
            .bind(avg_run)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Wordlist::try_from).transpose()
    }

    /// Record a new run.
    ///
    /// The stored run is always `NotStarted`, with an empty result and no
    /// elapsed time. Returns [`ErrorKind::DuplicateSession`] if the session
    /// token has been used before.
    pub async fn insert_run(&self, run: &NewRun) -> Result<Run> {
        let row = RunRow::from(run);
        let inserted = sqlx::query(include_str!("../queries/insert_run.sql"))
            .bind(&row.session)
            .bind(row.target_id)
            .bind(row.wordlist_id)
            .bind(row.started_at)
            .execute(&self.pool)
            .await;
        match inserted {
            Ok(_) => Run::try_from(row),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                exn::bail!(ErrorKind::DuplicateSession(row.session))
            },
            Err(err) => Err(err).or_raise(|| ErrorKind::Database),
        }
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Overwrite the result, elapsed time and status of a run.
    ///
    /// All three fields are always written together. Returns
    /// [`ErrorKind::RunNotFound`] if no run has this session; no row is
    /// created in that case.
    pub async fn update_run(&self, session: &Session, progress: &Progress) -> Result<()> {
        let result = sqlx::query(include_str!("../queries/update_run.sql"))
            .bind(&progress.result)
            .bind(elapsed_seconds(progress)?)
            .bind(progress.status.as_str())
            .bind(session.as_str())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::RunNotFound(session.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Get/Fetch
    // =========================================================================

    pub async fn get_target(&self, id: i64) -> Result<Option<Target>> {
        let row: Option<TargetRow> = sqlx::query_as(include_str!("../queries/get_target.sql"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Target::from))
    }

    pub async fn get_target_by_name(&self, name: impl AsRef<str>) -> Result<Option<Target>> {
        let row: Option<TargetRow> = sqlx::query_as(include_str!("../queries/get_target_by_name.sql"))
            .bind(name.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Target::from))
    }

    pub async fn get_wordlist(&self, id: i64) -> Result<Option<Wordlist>> {
        let row: Option<WordlistRow> = sqlx::query_as(include_str!("../queries/get_wordlist.sql"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Wordlist::try_from).transpose()
    }

    pub async fn get_wordlist_by_name(&self, name: impl AsRef<str>) -> Result<Option<Wordlist>> {
        let row: Option<WordlistRow> = sqlx::query_as(include_str!("../queries/get_wordlist_by_name.sql"))
            .bind(name.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Wordlist::try_from).transpose()
    }

    pub async fn get_run(&self, session: &Session) -> Result<Option<Run>> {
        let row: Option<RunRow> = sqlx::query_as(include_str!("../queries/get_run.sql"))
            .bind(session.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Run::try_from).transpose()
    }

    /// Whether at least one row in `table` has this name.
    pub async fn name_exists(&self, table: NamedTable, name: impl AsRef<str>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(table.exists_query())
            .bind(name.as_ref())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(exists)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    pub async fn list_targets(&self) -> Result<Vec<Target>> {
        let rows: Vec<TargetRow> = sqlx::query_as(include_str!("../queries/list_targets.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Target::from).collect())
    }

    pub async fn list_wordlists(&self) -> Result<Vec<Wordlist>> {
        let rows: Vec<WordlistRow> = sqlx::query_as(include_str!("../queries/list_wordlists.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Wordlist::try_from).collect()
    }

    /// Every run whose status is not `Done`, oldest first.
    pub async fn list_unfinished_runs(&self) -> Result<Vec<Run>> {
        let rows: Vec<RunRow> = sqlx::query_as(include_str!("../queries/list_unfinished_runs.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Run::try_from).collect()
    }

    /// Every run against a target, finished or not, oldest first.
    pub async fn list_runs_for_target(&self, target_id: i64) -> Result<Vec<Run>> {
        let rows: Vec<RunRow> = sqlx::query_as(include_str!("../queries/list_runs_for_target.sql"))
            .bind(target_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Run::try_from).collect()
    }

    // =========================================================================
    // Counts
    // =========================================================================

    pub async fn count_runs(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_runs.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("run count"))
    }
}
