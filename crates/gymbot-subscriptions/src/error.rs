use thiserror::Error;

/// Errors that can occur while reading or writing subscribers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored topic is not one of the known trigger intents.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
