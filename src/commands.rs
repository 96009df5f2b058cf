use crate::cli::{Resume, RunAction, TargetAction, WordlistAction};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sesame_john::John;
use sesame_ledger::{Ledger, Registration};
use sesame_store::{Run, Session};
use std::sync::Arc;

pub async fn target(ledger: &Ledger, action: TargetAction) -> Result<()> {
    match action {
        TargetAction::Add { name, bssid } => {
            let registration = ledger.register_target(&name, &bssid).await.or_raise(|| ErrorKind::Ledger)?;
            let verb = registered(&registration);
            let target = registration.get();
            println!("{verb} target #{} {} ({})", target.id, target.name, target.bssid);
        },
        TargetAction::List => {
            for target in ledger.targets().await.or_raise(|| ErrorKind::Ledger)? {
                println!("{:>4}  {:<32}  {}", target.id, target.name, target.bssid);
            }
        },
    }
    Ok(())
}

pub async fn wordlist(ledger: &Ledger, action: WordlistAction) -> Result<()> {
    match action {
        WordlistAction::Add { name, size, avg_run } => {
            let registration = ledger
                .register_wordlist(&name, &size, avg_run)
                .await
                .or_raise(|| ErrorKind::Ledger)?;
            let verb = registered(&registration);
            let wordlist = registration.get();
            println!("{verb} wordlist #{} {} ({})", wordlist.id, wordlist.name, wordlist.size);
        },
        WordlistAction::List => {
            for wordlist in ledger.wordlists().await.or_raise(|| ErrorKind::Ledger)? {
                println!(
                    "{:>4}  {:<32}  {:>8}  ~{}s",
                    wordlist.id, wordlist.name, wordlist.size, wordlist.avg_run
                );
            }
        },
    }
    Ok(())
}

/// Commands that hand work to john receive it; read-only ones get `None`.
pub async fn run(ledger: &Ledger, john: Option<&Arc<John>>, action: RunAction) -> Result<()> {
    match action {
        RunAction::Start { target, wordlist, session } => {
            let session = session.unwrap_or_else(|| generate_session(target, wordlist));
            let run = ledger.start_run(target, wordlist, session).await.or_raise(|| ErrorKind::Ledger)?;
            println!("started {}", run.session);
            if let Some(john) = john {
                john.join().await;
            }
            print_run(&ledger.run(&run.session).await.or_raise(|| ErrorKind::Ledger)?);
        },
        RunAction::Progress { session } => {
            print_run(&ledger.run(&Session::from(session)).await.or_raise(|| ErrorKind::Ledger)?);
        },
        RunAction::Unfinished => {
            for run in ledger.recover_unfinished().await.or_raise(|| ErrorKind::Ledger)? {
                print_run(&run);
            }
        },
        RunAction::Show { target } => {
            let target = ledger.target(target).await.or_raise(|| ErrorKind::Ledger)?;
            println!("{} ({})", target.name, target.bssid);
            for run in ledger.runs_for_target(target.id).await.or_raise(|| ErrorKind::Ledger)? {
                print_run(&run);
            }
        },
    }
    Ok(())
}

/// Offer runs to john again, then wait for all of them.
///
/// A run that cannot be resumed is reported and skipped; the others still go
/// ahead.
pub async fn resume(ledger: &Ledger, john: &Arc<John>, resume: Resume) -> Result<()> {
    let sessions: Vec<Session> = if resume.all {
        let runs = ledger.recover_unfinished().await.or_raise(|| ErrorKind::Ledger)?;
        runs.into_iter().map(|run| run.session).collect()
    } else {
        resume.sessions.into_iter().map(Session::from).collect()
    };
    let mut resumed = Vec::with_capacity(sessions.len());
    for session in sessions {
        match ledger.resume(&session).await {
            Ok(_) => resumed.push(session),
            Err(err) => tracing::error!(session = %session, error = ?err, "Could not resume run"),
        }
    }
    john.join().await;
    for session in &resumed {
        print_run(&ledger.run(session).await.or_raise(|| ErrorKind::Ledger)?);
    }
    Ok(())
}

fn registered<T>(registration: &Registration<T>) -> &'static str {
    if registration.is_created() { "registered" } else { "already registered" }
}

fn generate_session(target: i64, wordlist: i64) -> String {
    format!("t{target}-w{wordlist}-{}", time::UtcDateTime::now().unix_timestamp())
}

fn print_run(run: &Run) {
    println!(
        "{:<32}  {:<10}  {:>8}s  target #{} wordlist #{}  {}",
        run.session.as_str(),
        run.status.as_str(),
        run.elapsed_time.as_secs(),
        run.target_id,
        run.wordlist_id,
        run.result,
    );
}
