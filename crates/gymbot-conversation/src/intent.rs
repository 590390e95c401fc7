use gymbot_subscriptions::Topic;

use crate::error::ConversationError;

/// Every intent the platform routes to this webhook, by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Welcome,
    ClassList,
    SetupUpdates,
    FinishUpdateSetup,
    SetupPush,
    FinishPushSetup,
    /// Opened from a push notification.
    ClassCanceled,
    /// Administrative trigger: push to every `Class Canceled` subscriber.
    TestNotification,
    Fallback,
    NoInput,
}

impl Intent {
    pub const ALL: [Intent; 10] = [
        Intent::Welcome,
        Intent::ClassList,
        Intent::SetupUpdates,
        Intent::FinishUpdateSetup,
        Intent::SetupPush,
        Intent::FinishPushSetup,
        Intent::ClassCanceled,
        Intent::TestNotification,
        Intent::Fallback,
        Intent::NoInput,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Welcome => "Default Welcome Intent",
            Intent::ClassList => "Class List",
            Intent::SetupUpdates => "Setup Updates",
            Intent::FinishUpdateSetup => "Finish Update Setup",
            Intent::SetupPush => "Setup Push Notifications",
            Intent::FinishPushSetup => "Finish Push Setup",
            Intent::ClassCanceled => "Class Canceled",
            Intent::TestNotification => "Test Notification",
            Intent::Fallback => "Default Fallback Intent",
            Intent::NoInput => "No Input",
        }
    }

    /// The intent a notification topic opens.
    pub fn for_topic(topic: Topic) -> Self {
        match topic {
            Topic::ClassCanceled => Intent::ClassCanceled,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Intent {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.name() == s)
            .ok_or_else(|| ConversationError::UnknownIntent(s.to_string()))
    }
}
