use thiserror::Error;

#[derive(Debug, Error)]
pub enum GymbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GymbotError {
    /// Short error code string returned to the platform in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            GymbotError::Config(_) => "CONFIG_ERROR",
            GymbotError::AuthFailed(_) => "AUTH_FAILED",
            GymbotError::BadRequest(_) => "BAD_REQUEST",
            GymbotError::Serialization(_) => "SERIALIZATION_ERROR",
            GymbotError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The caller sent something unusable; retrying the same request won't help.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GymbotError::AuthFailed(_) | GymbotError::BadRequest(_) | GymbotError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GymbotError>;
