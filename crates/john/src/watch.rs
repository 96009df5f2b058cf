use crate::error::{ErrorKind, Result};
use crate::show;
use exn::ResultExt;
use sesame_ledger::executor::Reporter;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::instrument;

// Tokio intervals cannot tick with a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

enum Exit {
    Finished(ExitStatus),
    /// Ctrl-C reached us, and (being in the same process group) john too.
    Interrupted,
    Lost(std::io::Error),
}

/// Background supervision of one john process.
pub(crate) struct Watch {
    pub(crate) child: Child,
    pub(crate) reporter: Reporter,
    /// Time already spent on this run by earlier launches.
    pub(crate) carried: Duration,
    pub(crate) interval: Duration,
    /// Prepared `john --show` invocation for the run's target.
    pub(crate) show: Command,
}
impl Watch {
    /// Refresh the run while john works, then record how it ended: `Done`
    /// once the wordlist is exhausted, `Paused` on anything else.
    #[instrument(skip_all, fields(session = %self.reporter.session()))]
    pub(crate) async fn run(self) {
        let Watch { mut child, reporter, carried, interval, mut show } = self;
        let started = Instant::now();
        let interval = interval.max(MIN_INTERVAL);
        let mut ticker = tokio::time::interval_at(started + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Registered once, so a SIGINT arriving mid-refresh is not lost.
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let exit = loop {
            tokio::select! {
                status = child.wait() => break match status {
                    Ok(status) => Exit::Finished(status),
                    Err(err) => Exit::Lost(err),
                },
                _ = ticker.tick() => {
                    if let Err(err) = reporter.running(carried + started.elapsed()).await {
                        tracing::warn!(error = ?err, "Failed to refresh run progress");
                    }
                },
                _ = &mut ctrl_c => break Exit::Interrupted,
            }
        };
        if let Exit::Interrupted = exit {
            tracing::info!("Interrupted; waiting for john to save its session");
            _ = child.wait().await;
        }
        let elapsed = carried + started.elapsed();
        let recorded = match exit {
            Exit::Finished(status) if status.success() => match cracked(&mut show).await {
                Ok(result) => {
                    tracing::info!(elapsed = elapsed.as_secs(), "Wordlist exhausted");
                    reporter.done(result, elapsed).await
                },
                Err(err) => {
                    tracing::warn!(error = ?err, "Could not read cracked passwords; leaving run resumable");
                    reporter.paused(elapsed).await
                },
            },
            Exit::Finished(status) => {
                tracing::info!(code = ?status.code(), "John stopped before exhausting the wordlist");
                reporter.paused(elapsed).await
            },
            Exit::Interrupted => reporter.paused(elapsed).await,
            Exit::Lost(err) => {
                tracing::warn!(error = %err, "Lost track of john process");
                reporter.paused(elapsed).await
            },
        };
        if let Err(err) = recorded {
            tracing::error!(error = ?err, "Failed to record run outcome");
        }
    }
}

async fn cracked(show: &mut Command) -> Result<String> {
    let output = show.output().await.or_raise(|| ErrorKind::Io)?;
    if !output.status.success() {
        exn::bail!(ErrorKind::JohnFailed(output.status.code().unwrap_or(-1)));
    }
    Ok(show::result(&String::from_utf8_lossy(&output.stdout)))
}
