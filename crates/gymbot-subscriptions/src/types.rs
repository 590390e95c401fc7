use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A notification topic. Topics are named after the intent a push
/// notification opens, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Class Canceled")]
    ClassCanceled,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ClassCanceled => "Class Canceled",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Class Canceled" => Ok(Topic::ClassCanceled),
            other => Err(StoreError::UnknownTopic(other.to_string())),
        }
    }
}

/// A persisted opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// UUIDv7 primary key: time-sortable.
    pub id: String,
    /// Identifier the push API addresses the user by.
    pub user_id: String,
    pub topic: Topic,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}
