//! Parsing of `john --show` output.
//!
//! John prints one `login:password:...` line per cracked hash, then a blank
//! line and a summary such as `1 password hash cracked, 0 left`. When nothing
//! has been cracked only the summary is printed.

/// Cracked passwords, in the order John lists them.
pub(crate) fn passwords(output: &str) -> Vec<String> {
    output
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.splitn(3, ':');
            fields.next()?;
            fields.next()
        })
        .map(str::to_string)
        .collect()
}

const CRACKED: &str = "cracked:";
const EXHAUSTED: &str = "exhausted";

/// The result recorded for a finished run: `cracked:<password>` for the first
/// cracked password, or `exhausted` if the wordlist held no match.
pub(crate) fn result(output: &str) -> String {
    match passwords(output).into_iter().next() {
        Some(password) => format!("{CRACKED}{password}"),
        None => EXHAUSTED.to_string(),
    }
}
