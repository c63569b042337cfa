/// Errors that can occur while talking to the catalog or the tracker backend.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Game not found in catalog")]
    NotFound,

    #[error("Catalog source is not configured: {0}")]
    NotConfigured(String),

    #[error("Rate limited by catalog API")]
    RateLimit,

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LookupError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimit => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
