use thiserror::Error;

use release_radar_lib::{BacklogEditError, SettingsError};
use release_radar_lookup::LookupError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Backend or catalog request failed
    #[error("{0}")]
    Lookup(#[from] LookupError),

    /// Backlog edit was rejected or failed
    #[error("{0}")]
    Backlog(#[from] BacklogEditError),

    /// Settings file could not be read or written
    #[error("{0}")]
    Settings(#[from] SettingsError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
