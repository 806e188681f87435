//! Error types for Cliprelay.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Channel not found in roster: {0}")]
    ChannelNotFound(String),

    #[error("Invalid roster URL: {0}")]
    InvalidRosterUrl(String),

    #[error("Not authenticated with the roster service")]
    MissingToken,

    #[error("Roster service authentication failed: {0}")]
    AuthFailed(String),

    #[error("Roster service request failed: {0}")]
    RosterUnavailable(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RelayError {
    /// Whether this failure only means the acting channel could not be
    /// resolved right now. Such actions are dropped and logged; they never
    /// terminate the connection.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            RelayError::ChannelNotFound(_)
                | RelayError::MissingToken
                | RelayError::RosterUnavailable(_)
        )
    }
}
