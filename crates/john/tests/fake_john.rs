//! A run that stops early is restored to completion.
#![cfg(unix)]

mod common;

use common::Fixture;
use sesame_ledger::error::ErrorKind as LedgerErrorKind;
use sesame_store::{RunStatus, Session};

// One test per binary; see `common` on ETXTBSY.
#[tokio::test]
async fn test_interrupted_run_is_restored_to_completion() {
    let f = Fixture::new().await;
    let wordlist = f.wordlist("rockyou.txt").await;
    let session = Session::from("home-rockyou");

    // First launch stops early and leaves a saved session behind.
    f.ledger.start_run(f.target.id, wordlist.id, session.clone()).await.unwrap();
    f.john.join().await;
    assert_eq!(f.john.active().await, 0);
    let run = f.ledger.run(&session).await.unwrap();
    assert_eq!(run.status, RunStatus::Paused);
    assert_eq!(run.result, "");
    assert!(f.sessions.join("home-rockyou.rec").is_file());
    assert_eq!(f.ledger.recover_unfinished().await.unwrap().len(), 1);

    // Resuming restores the saved session rather than starting over.
    f.ledger.resume(&session).await.unwrap();
    f.john.join().await;
    let run = f.ledger.run(&session).await.unwrap();
    assert_eq!(run.status, RunStatus::Done);
    assert_eq!(run.result, "cracked:hunter2");
    assert!(!f.sessions.join("home-rockyou.rec").exists());
    assert!(f.ledger.recover_unfinished().await.unwrap().is_empty());

    let calls = f.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("--session="));
    assert!(calls[0].contains("--format=wpapsk"));
    assert!(calls[1].starts_with("--restore="));
    assert!(calls[2].starts_with("--show"));

    // Done runs are never handed out again.
    let err = f.ledger.resume(&session).await.unwrap_err();
    assert!(matches!(&*err, LedgerErrorKind::AlreadyDone(_)));

    // A missing capture refuses to start and leaves the run for recovery.
    let ghost = f.ledger.register_target("ghost.cap", "66:77:88:99:aa:bb").await.unwrap().into_inner();
    let err = f.ledger.start_run(ghost.id, wordlist.id, "ghost-rockyou").await.unwrap_err();
    assert!(matches!(&*err, LedgerErrorKind::Executor));
    let run = f.ledger.run(&Session::from("ghost-rockyou")).await.unwrap();
    assert_eq!(run.status, RunStatus::NotStarted);

    // Names that would escape their directories never reach john.
    let escaping = f.ledger.register_target("/etc/shadow", "66:77:88:99:aa:bb").await.unwrap().into_inner();
    let err = f.ledger.start_run(escaping.id, wordlist.id, "absolute").await.unwrap_err();
    assert!(matches!(&*err, LedgerErrorKind::Executor));
    let err = f.ledger.start_run(f.target.id, wordlist.id, "../../tmp/evil").await.unwrap_err();
    assert!(matches!(&*err, LedgerErrorKind::Executor));
    for session in ["absolute", "../../tmp/evil"] {
        let run = f.ledger.run(&Session::from(session)).await.unwrap();
        assert_eq!(run.status, RunStatus::NotStarted);
    }
    assert_eq!(f.calls().len(), 3);
    assert_eq!(f.john.active().await, 0);
    f.db.close().await;
}
