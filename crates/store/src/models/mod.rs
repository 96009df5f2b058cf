mod run;
mod target;
mod wordlist;

pub(crate) use self::run::{RunRow, elapsed_seconds};
pub(crate) use self::target::TargetRow;
pub(crate) use self::wordlist::WordlistRow;
