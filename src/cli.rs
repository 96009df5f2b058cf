use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sesame", version, about = "Resumable ledger of WPA password-recovery runs")]
pub struct Cli {
    /// Config file (TOML, YAML or JSON) layered over the defaults
    #[arg(long, short, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Wordlists
    Wordlist {
        #[command(subcommand)]
        action: WordlistAction,
    },
    /// Cracking runs
    Run {
        #[command(subcommand)]
        action: RunAction,
    },
    /// Continue unfinished runs
    Resume(Resume),
}

#[derive(Debug, Subcommand)]
pub enum TargetAction {
    /// Register a capture file by name
    Add {
        /// Capture filename inside the captures directory
        name: String,
        /// Access point MAC address
        bssid: String,
    },
    /// List registered targets
    List,
}

#[derive(Debug, Subcommand)]
pub enum WordlistAction {
    /// Register a wordlist by name
    Add {
        /// Wordlist filename inside the wordlists directory
        name: String,
        /// Human-readable size, e.g. "14M"
        size: String,
        /// Typical run duration, in seconds
        #[arg(long, default_value_t = 0)]
        avg_run: u64,
    },
    /// List registered wordlists
    List,
}

#[derive(Debug, Subcommand)]
pub enum RunAction {
    /// Start cracking a target with a wordlist and wait for it to finish
    Start {
        #[arg(value_name = "TARGET_ID")]
        target: i64,
        #[arg(value_name = "WORDLIST_ID")]
        wordlist: i64,
        /// Session token; generated when omitted
        #[arg(long)]
        session: Option<String>,
    },
    /// Show the recorded state of one run
    Progress { session: String },
    /// List every run that has not finished
    Unfinished,
    /// List every run against a target
    Show {
        #[arg(value_name = "TARGET_ID")]
        target: i64,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Resume {
    /// Resume every unfinished run
    #[arg(long)]
    pub all: bool,
    /// Sessions to resume
    pub sessions: Vec<String>,
}
