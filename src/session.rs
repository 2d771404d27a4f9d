use crate::error::SentryError;
use std::env;

/// Per-connection authentication state. The token is resolved once when the
/// session is created and never replaced afterwards; every operation handler
/// receives the session explicitly instead of reading ambient state.
#[derive(Debug, Clone)]
pub struct SentrySession {
    auth_token: Option<String>,
}

impl SentrySession {
    pub fn new(auth_token: Option<String>) -> Self {
        Self { auth_token }
    }

    /// Builds a session from the process-level default token, if any.
    pub fn from_env() -> Self {
        Self::new(env::var("SENTRY_AUTH_TOKEN").ok())
    }

    pub fn token(&self) -> Result<&str, SentryError> {
        self.auth_token
            .as_deref()
            .ok_or(SentryError::MissingAuthToken)
    }
}
