//! Configuration system: optional TOML file + env var overrides + defaults.
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, `SWEEP_*`
//! environment variables, command-line flags (applied by the binary).
//!
//! ```toml
//! path = "/tmp/"
//! dry_run = false
//! age_source = "changed"
//!
//! [files]
//! enabled = true
//! max_age_days = 30
//!
//! [folders]
//! enabled = false
//! max_age_days = 10
//!
//! [logging]
//! jsonl_path = "/var/log/sweep/activity.jsonl"
//! ```
//!
//! A `[files]` or `[folders]` table must set both of its keys.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};
use crate::core::paths::resolve_root;
use crate::sweeper::entry::AgeSource;
use crate::sweeper::orchestrator::SweepRequest;
use crate::sweeper::retention::RetentionPolicy;

/// Sweep root used when none is given.
pub const DEFAULT_ROOT: &str = "/tmp/";

/// Full sweeper configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub path: PathBuf,
    pub dry_run: bool,
    pub age_source: AgeSource,
    pub files: RetentionPolicy,
    pub folders: RetentionPolicy,
    pub logging: LoggingConfig,
}

/// Activity-log destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append JSONL activity events here when set.
    pub jsonl_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ROOT),
            dry_run: false,
            age_source: AgeSource::default(),
            files: RetentionPolicy::files_default(),
            folders: RetentionPolicy::folders_default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load defaults or an explicit TOML file, then apply env overrides and validate.
    ///
    /// There is no implicit config location; without `path` only defaults and
    /// the environment apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) if path.exists() => {
                let raw = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
                Self::from_toml_str(&raw)?
            }
            Some(path) => {
                return Err(SweepError::MissingConfig {
                    path: path.to_path_buf(),
                });
            }
            None => Self::default(),
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `SWEEP_*` overrides read through `lookup`.
    pub fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("SWEEP_PATH") {
            self.path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("SWEEP_DRY_RUN") {
            self.dry_run = parse_env_bool("SWEEP_DRY_RUN", &raw)?;
        }
        if let Some(raw) = lookup("SWEEP_AGE_SOURCE") {
            self.age_source = raw.parse()?;
        }

        if let Some(raw) = lookup("SWEEP_FILES_ENABLED") {
            self.files.enabled = parse_env_bool("SWEEP_FILES_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SWEEP_FILES_AFTER_DAYS") {
            self.files.max_age_days = parse_env_i64("SWEEP_FILES_AFTER_DAYS", &raw)?;
        }
        if let Some(raw) = lookup("SWEEP_FOLDERS_ENABLED") {
            self.folders.enabled = parse_env_bool("SWEEP_FOLDERS_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SWEEP_FOLDERS_AFTER_DAYS") {
            self.folders.max_age_days = parse_env_i64("SWEEP_FOLDERS_AFTER_DAYS", &raw)?;
        }

        if let Some(raw) = lookup("SWEEP_LOG_FILE") {
            self.logging.jsonl_path = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    /// Reject values the sweep cannot act on sensibly.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(SweepError::InvalidConfig {
                details: "path must not be empty".to_string(),
            });
        }

        // A negative threshold would put the cutoff in the future and match
        // every entry.
        for (name, policy) in [("files", self.files), ("folders", self.folders)] {
            if policy.max_age_days < 0 {
                return Err(SweepError::InvalidConfig {
                    details: format!(
                        "{name}.max_age_days must be >= 0, got {}",
                        policy.max_age_days
                    ),
                });
            }
        }

        if let Some(path) = &self.logging.jsonl_path
            && path.as_os_str().is_empty()
        {
            return Err(SweepError::InvalidConfig {
                details: "logging.jsonl_path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve into the orchestrator's input, making the root absolute.
    #[must_use]
    pub fn request(&self) -> SweepRequest {
        SweepRequest {
            root: resolve_root(&self.path),
            files: self.files,
            folders: self.folders,
            dry_run: self.dry_run,
            age_source: self.age_source,
        }
    }
}

/// Command-line toggle semantics: case-insensitive `yes` is true, anything
/// else (including an empty value) is false.
#[must_use]
pub fn parse_toggle(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("yes")
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_i64(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|error| SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected a boolean"),
        }),
    }
}
