//! John the Ripper executor.
//!
//! Drives the `john` command line on behalf of the ledger: a fresh run starts
//! a named session against a capture and a wordlist, and a run that was
//! interrupted earlier is continued with `--restore`. Progress flows back
//! through the ledger's [`Reporter`].

mod command;
mod discover;
pub mod error;
mod options;
mod show;
mod watch;

use crate::error::{ErrorKind, Result};
pub use crate::options::Options;
use crate::watch::Watch;
use async_trait::async_trait;
use exn::ResultExt;
use sesame_ledger::error::{ErrorKind as LedgerErrorKind, Result as LedgerResult};
use sesame_ledger::executor::{Assignment, Executor, Reporter};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::instrument;

pub struct John {
    binary: PathBuf,
    options: Options,
    watchers: Mutex<JoinSet<()>>,
}
impl John {
    pub fn new(options: Options) -> Result<Self> {
        let binary = discover::discover(options.binary.as_deref())?;
        Ok(Self { binary, options, watchers: Mutex::new(JoinSet::new()) })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Number of john processes still being supervised.
    pub async fn active(&self) -> usize {
        self.watchers.lock().await.len()
    }

    /// Wait for every john process started so far to finish, and for its
    /// outcome to be recorded.
    pub async fn join(&self) {
        let mut watchers = self.watchers.lock().await;
        while let Some(joined) = watchers.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "Run supervisor task failed");
            }
        }
    }

    #[instrument(skip_all, fields(session = %assignment.session()))]
    async fn launch(&self, assignment: Assignment, reporter: Reporter) -> Result<()> {
        self.options.check(&assignment)?;
        let capture = self.options.capture(&assignment.target);
        if !capture.is_file() {
            exn::bail!(ErrorKind::CaptureNotFound(capture));
        }
        // John deletes the .rec file once a session completes, and never wrote
        // one if it died early; either way there is nothing to restore.
        let restore = assignment.is_resumption() && self.options.restore_file(assignment.session()).is_file();
        if !restore {
            let wordlist = self.options.wordlist(&assignment.wordlist);
            if !wordlist.is_file() {
                exn::bail!(ErrorKind::WordlistNotFound(wordlist));
            }
        }
        tokio::fs::create_dir_all(&self.options.sessions)
            .await
            .or_raise(|| ErrorKind::SessionDirectory(self.options.sessions.clone()))?;

        let args = command::crack(&self.options, &assignment, restore);
        tracing::info!(restore, target = %assignment.target.name, wordlist = %assignment.wordlist.name, "Starting john");
        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .or_raise(|| ErrorKind::Spawn)?;
        let carried = assignment.run.elapsed_time;
        reporter.running(carried).await.or_raise(|| ErrorKind::Report)?;

        let mut show = Command::new(&self.binary);
        show.args(command::show(&self.options, &assignment.target)).stdin(Stdio::null()).stderr(Stdio::null());
        let watch = Watch {
            child,
            reporter,
            carried,
            interval: self.options.progress_interval,
            show,
        };
        self.watchers.lock().await.spawn(watch.run());
        Ok(())
    }
}

#[async_trait]
impl Executor for John {
    fn name(&self) -> &str {
        "john"
    }

    async fn begin(&self, assignment: Assignment, reporter: Reporter) -> LedgerResult<()> {
        self.launch(assignment, reporter).await.or_raise(|| LedgerErrorKind::Executor)
    }
}
