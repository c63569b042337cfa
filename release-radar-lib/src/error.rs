use thiserror::Error;

use crate::draft::ValidationErrors;

/// Generic message shown when the entry store rejects a submission.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save game. Please try again.";

/// Why a form submission could not be sent. Store failures arrive later as
/// `FormUpdate::SubmitFailed`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft failed validation; nothing was sent.
    #[error("Draft is invalid: {0}")]
    Invalid(#[from] ValidationErrors),

    /// A submission for this form is already in flight.
    #[error("A submission is already in progress")]
    InFlight,

    /// The form was closed (or already submitted successfully).
    #[error("Form is closed")]
    Closed,
}

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Unknown key or a value of the wrong shape.
    #[error("{0}")]
    Invalid(String),
}

impl SettingsError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
