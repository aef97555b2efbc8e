//! SWP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for the retention sweeper.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[SWP-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SWP-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SWP-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SWP-2001] \"{path}\" is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("[SWP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SWP-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[SWP-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SWP-1001",
            Self::MissingConfig { .. } => "SWP-1002",
            Self::ConfigParse { .. } => "SWP-1003",
            Self::NotADirectory { .. } => "SWP-2001",
            Self::Serialization { .. } => "SWP-2101",
            Self::PermissionDenied { .. } => "SWP-3001",
            Self::Io { .. } => "SWP-3002",
        }
    }

    /// Whether the failure stems from user input rather than the host.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::NotADirectory { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    ///
    /// Permission failures are lifted into [`SweepError::PermissionDenied`].
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == ErrorKind::PermissionDenied {
            return Self::PermissionDenied { path };
        }
        Self::Io { path, source }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
