//! Layered configuration for sesame.
//!
//! Later layers override earlier ones:
//!
//! 1. built-in defaults, rooted in the platform data directory;
//! 2. `sesame.toml` in the platform config directory, if present;
//! 3. an explicit config file (TOML, YAML or JSON, by extension);
//! 4. `SESAME_` environment variables, with `__` separating nested keys
//!    (`SESAME_JOHN__FORMAT=wpapsk-opencl`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APPLICATION: &str = "sesame";
const USER_CONFIG_FILE: &str = "sesame.toml";
const ENV_PREFIX: &str = "SESAME_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite ledger file.
    pub database: PathBuf,
    pub john: JohnConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JohnConfig {
    /// Explicit john executable; searched for on `PATH` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<PathBuf>,
    /// Directory of capture files. A target's name is its filename here.
    pub captures: PathBuf,
    /// Directory of wordlists. A wordlist's name is its filename here.
    pub wordlists: PathBuf,
    /// Where john keeps session (`.rec`) and pot files.
    pub sessions: PathBuf,
    pub format: String,
    /// Seconds between elapsed-time refreshes of a running session.
    pub progress_interval: u64,
}
impl JohnConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval)
    }
}

impl Config {
    /// Defaults rooted at `data`.
    pub fn rooted_at(data: &Path) -> Self {
        Self {
            database: data.join("ledger.db"),
            john: JohnConfig {
                binary: None,
                captures: data.join("captures"),
                wordlists: data.join("wordlists"),
                sessions: data.join("sessions"),
                format: "wpapsk".to_string(),
                progress_interval: 60,
            },
        }
    }

    /// Load configuration from every layer, with an optional explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", APPLICATION).ok_or_raise(|| ErrorKind::NoHomeDirectory)?;
        let user = dirs.config_dir().join(USER_CONFIG_FILE);
        Self::layered(Self::rooted_at(dirs.data_dir()), Some(&user), explicit)
    }

    /// Merge the layers on top of `defaults` and validate the result.
    ///
    /// A missing `user` file is skipped, but a missing `explicit` file is an
    /// error.
    pub fn layered(defaults: Self, user: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(defaults));
        if let Some(user) = user {
            tracing::debug!(path = %user.display(), exists = user.is_file(), "User config file");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(explicit) = explicit {
            figment = merge_file(figment, explicit)?;
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.john.progress_interval == 0 {
            exn::bail!(ErrorKind::Invalid("john.progress_interval must be at least one second"));
        }
        if self.john.format.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("john.format must not be empty"));
        }
        Ok(())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
