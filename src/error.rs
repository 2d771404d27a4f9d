use thiserror::Error;

/// Failure kinds surfaced by issue lookup. Each variant maps to a distinct
/// caller-visible message; the rmcp layer translates them in
/// `tools::to_mcp_error`.
#[derive(Debug, Error)]
pub enum SentryError {
    #[error("{0}")]
    InvalidIdentifier(String),
    #[error("Error: Unauthorized. Please check your SENTRY_AUTH_TOKEN token.")]
    Unauthorized,
    #[error("No Sentry events found for this issue")]
    NoEvents,
    #[error("Error fetching Sentry issue: {0}")]
    Transport(String),
    #[error("Sentry authentication token not found. Please specify your Sentry auth token.")]
    MissingAuthToken,
}

impl From<reqwest::Error> for SentryError {
    fn from(err: reqwest::Error) -> Self {
        SentryError::Transport(err.to_string())
    }
}
