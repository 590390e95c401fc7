use gymbot_schedule::ScheduleError;
use gymbot_subscriptions::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversationError {
    /// The platform sent an intent this webhook has no handler for.
    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    /// Opt-in arrived with neither an updates user id nor a conversation id.
    #[error("no user identifier available for opt-in")]
    MissingUserId,

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("subscriber store error: {0}")]
    Store(#[from] StoreError),
}

impl ConversationError {
    /// True when the request itself is at fault rather than our data or storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConversationError::UnknownIntent(_) | ConversationError::MissingUserId
        )
    }
}

pub type Result<T> = std::result::Result<T, ConversationError>;
