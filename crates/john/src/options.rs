use crate::error::{ErrorKind, Result};
use sesame_ledger::executor::Assignment;
use sesame_store::{Session, Target, Wordlist};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const DEFAULT_FORMAT: &str = "wpapsk";
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(60);
const POT_FILE: &str = "sesame.pot";

/// Where John finds its inputs and keeps its state.
///
/// A target's name is the filename of its capture inside `captures`, and a
/// wordlist's name is its filename inside `wordlists`. Session (`.rec`) files
/// and the pot file live in `sessions`, so that an interrupted run can be
/// restored by session token alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Explicit path to the john binary; searched for on `PATH` if unset.
    pub binary: Option<PathBuf>,
    pub captures: PathBuf,
    pub wordlists: PathBuf,
    pub sessions: PathBuf,
    /// John hash format name, passed as `--format`.
    pub format: String,
    /// How often a running session refreshes its elapsed time in the ledger.
    pub progress_interval: Duration,
}
impl Options {
    pub fn new(captures: impl Into<PathBuf>, wordlists: impl Into<PathBuf>, sessions: impl Into<PathBuf>) -> Self {
        Self {
            binary: None,
            captures: captures.into(),
            wordlists: wordlists.into(),
            sessions: sessions.into(),
            format: DEFAULT_FORMAT.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub(crate) fn capture(&self, target: &Target) -> PathBuf {
        self.captures.join(&target.name)
    }

    pub(crate) fn wordlist(&self, wordlist: &Wordlist) -> PathBuf {
        self.wordlists.join(&wordlist.name)
    }

    /// Session name as given to John; it appends `.rec` and `.log` itself.
    pub(crate) fn session(&self, session: &Session) -> PathBuf {
        self.sessions.join(session.as_str())
    }

    pub(crate) fn restore_file(&self, session: &Session) -> PathBuf {
        let mut path = OsString::from(self.session(session));
        path.push(".rec");
        PathBuf::from(path)
    }

    pub(crate) fn pot_file(&self) -> PathBuf {
        self.sessions.join(POT_FILE)
    }

    /// Refuse any name that would resolve outside its directory.
    pub(crate) fn check(&self, assignment: &Assignment) -> Result<()> {
        check_name(&assignment.target.name)?;
        check_name(&assignment.wordlist.name)?;
        check_name(assignment.session().as_str())
    }
}

/// A name must be exactly one plain path component: no separators, no root,
/// no `..` and no null bytes.
pub(crate) fn check_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if !part.as_encoded_bytes().contains(&0) => Ok(()),
        _ => exn::bail!(ErrorKind::InvalidName(name.to_string())),
    }
}
