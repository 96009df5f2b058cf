//! Argument construction for the john command line.

use crate::options::Options;
use sesame_ledger::executor::Assignment;
use sesame_store::Target;
use std::ffi::{OsStr, OsString};

fn flag(name: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut flag = OsString::from(format!("--{name}="));
    flag.push(value);
    flag
}

/// Arguments to crack (or, with `restore`, continue cracking) an assignment.
///
/// A restored session carries all of its original options in its `.rec`
/// file, so nothing else may be passed alongside `--restore`.
pub(crate) fn crack(options: &Options, assignment: &Assignment, restore: bool) -> Vec<OsString> {
    let session = options.session(assignment.session());
    if restore {
        return vec![flag("restore", session)];
    }
    vec![
        flag("session", session),
        flag("pot", options.pot_file()),
        flag("format", &options.format),
        flag("wordlist", options.wordlist(&assignment.wordlist)),
        options.capture(&assignment.target).into_os_string(),
    ]
}

/// Arguments to print what has been cracked for a target.
pub(crate) fn show(options: &Options, target: &Target) -> Vec<OsString> {
    vec![
        OsString::from("--show"),
        flag("pot", options.pot_file()),
        flag("format", &options.format),
        options.capture(target).into_os_string(),
    ]
}
