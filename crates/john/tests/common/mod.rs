//! A shell script posing as john, and the ledger wired up around it.
//!
//! What the script does on a fresh session depends on the wordlist:
//! - `slow.txt`: works for three seconds, then exhausts the list;
//! - `interrupt.txt`: sends SIGINT to its parent (us), then saves and stops;
//! - anything else: saves its session and stops with exit code 1.
//!
//! Restoring a saved session removes the `.rec` file and succeeds, and
//! `--show` always reports `hunter2`.

#![allow(dead_code)]

use sesame_john::{John, Options};
use sesame_ledger::Ledger;
use sesame_store::{Database, Target, Wordlist};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub sessions: PathBuf,
    pub john: Arc<John>,
    pub db: Database,
    pub ledger: Ledger,
    pub target: Target,
}
impl Fixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let captures = dir.path().join("captures");
        let wordlists = dir.path().join("wordlists");
        let sessions = dir.path().join("sessions");
        std::fs::create_dir_all(&captures).unwrap();
        std::fs::create_dir_all(&wordlists).unwrap();
        std::fs::write(captures.join("home.cap"), b"capture").unwrap();
        for name in ["rockyou.txt", "slow.txt", "interrupt.txt"] {
            std::fs::write(wordlists.join(name), b"hunter2\n").unwrap();
        }

        // Written before anything is spawned: exec of a file still open for
        // writing in a forked child fails with ETXTBSY.
        let options = Options::new(&captures, &wordlists, &sessions)
            .with_binary(fake_john(dir.path()))
            .with_progress_interval(Duration::from_millis(20));
        let john = Arc::new(John::new(options).unwrap());
        let db = Database::connect_in_memory().await.unwrap();
        let ledger = Ledger::new(db.repository(), john.clone());
        let target = ledger.register_target("home.cap", "00:11:22:33:44:55").await.unwrap().into_inner();
        Self { dir, sessions, john, db, ledger, target }
    }

    pub async fn wordlist(&self, name: &str) -> Wordlist {
        self.ledger.register_wordlist(name, "8B", 1).await.unwrap().into_inner()
    }

    /// Every invocation of the script, one line of arguments each.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn fake_john(dir: &Path) -> PathBuf {
    let path = dir.join("john");
    let script = format!(
        r#"#!/bin/sh
echo "$*" >> "{log}"
session=""
for arg in "$@"; do
    case "$arg" in
        --show)
            printf 'home.cap:hunter2:00-11-22-33-44-55::home.cap\n\n1 password hash cracked, 0 left\n'
            exit 0 ;;
        --restore=*)
            rm -f "${{arg#--restore=}}.rec"
            exit 0 ;;
        --session=*)
            session="${{arg#--session=}}" ;;
        --wordlist=*slow.txt)
            sleep 3
            exit 0 ;;
        --wordlist=*interrupt.txt)
            sleep 1
            kill -INT $PPID
            sleep 1 ;;
    esac
done
touch "$session.rec"
exit 1
"#,
        log = dir.join("calls.log").display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
