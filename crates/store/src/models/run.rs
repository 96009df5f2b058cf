use crate::error::{Error, ErrorKind};
use crate::types::{NewRun, Progress, Run, RunStatus, Session};
use exn::ResultExt;
use std::time::Duration;
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct RunRow {
    pub(crate) session: String,
    pub(crate) target_id: i64,
    pub(crate) wordlist_id: i64,
    pub(crate) result: String,
    pub(crate) elapsed_time: i64,
    pub(crate) started_at: i64,
    pub(crate) status: String,
}
impl From<&NewRun> for RunRow {
    fn from(run: &NewRun) -> Self {
        Self {
            session: run.session.as_str().to_string(),
            target_id: run.target_id,
            wordlist_id: run.wordlist_id,
            result: String::new(),
            elapsed_time: 0,
            started_at: run.started_at.unix_timestamp(),
            status: RunStatus::NotStarted.as_str().to_string(),
        }
    }
}
impl TryFrom<RunRow> for Run {
    type Error = Error;
    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        Ok(Self {
            session: Session::from(row.session),
            target_id: row.target_id,
            wordlist_id: row.wordlist_id,
            result: row.result,
            elapsed_time: Duration::from_secs(
                u64::try_from(row.elapsed_time).or_raise(|| ErrorKind::InvalidData("elapsed time"))?,
            ),
            started_at: UtcDateTime::from_unix_timestamp(row.started_at)
                .or_raise(|| ErrorKind::InvalidData("start date"))?,
            status: row.status.parse::<RunStatus>().or_raise(|| ErrorKind::InvalidData("status"))?,
        })
    }
}

/// Seconds, as stored in the `elapsed_time` column.
pub(crate) fn elapsed_seconds(progress: &Progress) -> Result<i64, Error> {
    i64::try_from(progress.elapsed_time.as_secs()).or_raise(|| ErrorKind::InvalidData("elapsed time"))
}
