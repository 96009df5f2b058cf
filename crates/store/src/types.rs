//! Ledger models.
//!
//! These are the types handed to and returned from the [`Repository`](crate::Repository).
//! Their database representations live in the private `models` module.

use derive_more::Display;
use std::str::FromStr;
use std::time::Duration;
use time::UtcDateTime;

/// A capture target (WPA handshake).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Store-assigned identity, immutable once created.
    pub id: i64,
    /// Unique human-assigned label.
    pub name: String,
    /// Hardware address of the access point. Not validated.
    pub bssid: String,
}

/// A candidate-password source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist {
    pub id: i64,
    pub name: String,
    /// Opaque, human-readable capacity (e.g. `"14M"`).
    pub size: String,
    /// Expected duration of a run against this list, in caller-defined units.
    pub avg_run: u64,
}

/// Opaque token identifying one physical attempt.
///
/// This is the only handle used to update a run after it has been created.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Session(String);
impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
impl AsRef<str> for Session {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl From<String> for Session {
    fn from(token: String) -> Self {
        Self(token)
    }
}
impl From<&str> for Session {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Lifecycle state of a run.
///
/// ```text
/// NotStarted --> Running --> Done
///                   ^  \
///                   |   v
///                  Paused
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Recorded, but the executor has not picked it up yet.
    #[default]
    NotStarted,
    Running,
    /// Interrupted; may be resumed later.
    Paused,
    /// Terminal. The result is final.
    Done,
}
impl RunStatus {
    pub const ALL: [RunStatus; 4] = [Self::NotStarted, Self::Running, Self::Paused, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Done => "Done",
        }
    }

    /// Only [`Done`](Self::Done) is terminal; everything else is resumable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The given string is not one of the four status values.
#[derive(Debug, Display, derive_more::Error)]
#[display("unknown run status: {_0}")]
pub struct UnknownStatus(#[error(not(source))] pub String);

impl FromStr for RunStatus {
    type Err = UnknownStatus;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One attempt to crack a target with a wordlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub session: Session,
    pub target_id: i64,
    pub wordlist_id: i64,
    /// Empty until the run reaches a terminal state.
    pub result: String,
    /// Accumulated duration, at one-second granularity.
    pub elapsed_time: Duration,
    pub started_at: UtcDateTime,
    pub status: RunStatus,
}

/// Request to record a new run.
///
/// There is deliberately no way to supply a status, result or elapsed time: a
/// new run always starts out as `NotStarted` with nothing accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRun {
    pub session: Session,
    pub target_id: i64,
    pub wordlist_id: i64,
    pub started_at: UtcDateTime,
}
impl NewRun {
    /// A new run starting now.
    pub fn new(session: impl Into<Session>, target_id: i64, wordlist_id: i64) -> Self {
        Self {
            session: session.into(),
            target_id,
            wordlist_id,
            started_at: UtcDateTime::now(),
        }
    }

    pub fn started_at(mut self, started_at: UtcDateTime) -> Self {
        self.started_at = started_at;
        self
    }
}

/// A progress update. Every update carries all three fields; there are no
/// partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub result: String,
    pub elapsed_time: Duration,
    pub status: RunStatus,
}
impl Progress {
    pub fn new(result: impl Into<String>, elapsed_time: Duration, status: RunStatus) -> Self {
        Self { result: result.into(), elapsed_time, status }
    }

    /// Still working; no result yet.
    pub fn running(elapsed_time: Duration) -> Self {
        Self::new("", elapsed_time, RunStatus::Running)
    }

    pub fn paused(elapsed_time: Duration) -> Self {
        Self::new("", elapsed_time, RunStatus::Paused)
    }

    pub fn done(result: impl Into<String>, elapsed_time: Duration) -> Self {
        Self::new(result, elapsed_time, RunStatus::Done)
    }
}
