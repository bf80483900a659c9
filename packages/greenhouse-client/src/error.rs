use thiserror::Error;

/// Errors returned by the board API client.
#[derive(Debug, Error)]
pub enum GreenhouseError {
    /// The board token does not exist (HTTP 404).
    #[error("Not found")]
    NotFound { token: String },

    /// Any other non-success status.
    #[error("board API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GreenhouseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GreenhouseError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, GreenhouseError>;
