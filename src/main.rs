//! sesame: keep track of which wordlists have been tried against which
//! captures, and pick interrupted John the Ripper sessions back up.

mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::{Cli, Command, RunAction};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use clap::Parser;
use exn::ResultExt;
use sesame_config::Config;
use sesame_john::{John, Options};
use sesame_ledger::error::{ErrorKind as LedgerErrorKind, Result as LedgerResult};
use sesame_ledger::executor::{Assignment, Executor, Reporter};
use sesame_ledger::{ExecutorHandle, Ledger};
use sesame_store::Database;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "sesame failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    tracing::debug!(?config, "Configuration loaded");

    if let Some(parent) = config.database.parent() {
        std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
    }
    // A database whose schema cannot be created is unusable; nothing below
    // makes sense without it.
    let db = Database::connect(&config.database).await.or_raise(|| ErrorKind::Database)?;

    let john = match &cli.command {
        Command::Run { action: RunAction::Start { .. } } | Command::Resume(_) => Some(Arc::new(john(&config)?)),
        _ => None,
    };
    let executor: ExecutorHandle = match &john {
        Some(john) => john.clone(),
        None => Arc::new(Offline),
    };
    let ledger = Ledger::new(db.repository(), executor);
    let unfinished = ledger.recover_unfinished().await.or_raise(|| ErrorKind::Ledger)?;
    if !unfinished.is_empty() {
        tracing::info!(count = unfinished.len(), "Unfinished runs can be continued with `sesame resume`");
    }

    let outcome = match cli.command {
        Command::Target { action } => commands::target(&ledger, action).await,
        Command::Wordlist { action } => commands::wordlist(&ledger, action).await,
        Command::Run { action } => commands::run(&ledger, john.as_ref(), action).await,
        Command::Resume(resume) => match &john {
            Some(john) => commands::resume(&ledger, john, resume).await,
            None => Err(exn::Exn::from(ErrorKind::John)),
        },
    };
    db.close().await;
    outcome
}

fn john(config: &Config) -> Result<John> {
    let mut options = Options::new(&config.john.captures, &config.john.wordlists, &config.john.sessions)
        .with_format(&config.john.format)
        .with_progress_interval(config.john.progress_interval());
    if let Some(binary) = &config.john.binary {
        options = options.with_binary(binary);
    }
    let john = John::new(options).or_raise(|| ErrorKind::John)?;
    tracing::debug!(binary = %john.binary().display(), "Using john");
    Ok(john)
}

/// Executor for commands that only read or register; it never takes work.
struct Offline;

#[async_trait]
impl Executor for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    async fn begin(&self, _assignment: Assignment, _reporter: Reporter) -> LedgerResult<()> {
        exn::bail!(LedgerErrorKind::Executor);
    }
}
