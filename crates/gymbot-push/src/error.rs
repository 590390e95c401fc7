use gymbot_subscriptions::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    /// No service account key is configured, so no token can be minted.
    #[error("push delivery is not configured: {0}")]
    NotConfigured(String),

    /// The service account key could not be read or parsed.
    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    /// Token exchange was rejected by the authorization server.
    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("subscriber query failed: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, PushError>;
