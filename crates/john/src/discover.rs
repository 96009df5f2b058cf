use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};

// Distribution packages disagree on what to call it. The snap exposes the
// jumbo build under its namespaced name.
const EXECUTABLES: [&str; 3] = ["john", "john-the-ripper", "john-the-ripper.john"];

/// Locate the John the Ripper executable.
///
/// An explicitly configured path wins and must exist; otherwise `PATH` is
/// searched for the usual executable names.
pub(crate) fn discover(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        exn::bail!(ErrorKind::BinaryNotFound(path.to_path_buf()));
    }
    for exe in EXECUTABLES {
        if let Ok(path) = which::which(exe) {
            tracing::debug!(john = %path.display(), "Discovered john executable");
            return Ok(path);
        }
    }
    tracing::info!("John the Ripper executable not found in PATH");
    exn::bail!(ErrorKind::JohnNotFound);
}
