use gymbot_protocol::SystemIntent;
use gymbot_subscriptions::Topic;

use crate::intent::Intent;

/// Whether the conversation continues after this reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep the session open and wait for the user.
    Ask,
    /// End the session.
    Close,
}

/// A platform helper flow started by the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    /// Register a daily re-invocation of the given intent.
    DailyUpdate(Intent),
    /// Ask for push permission on a topic.
    PushPermission(Topic),
}

impl Helper {
    pub fn to_system_intent(self) -> SystemIntent {
        match self {
            Helper::DailyUpdate(intent) => SystemIntent::register_daily_update(intent.name()),
            Helper::PushPermission(topic) => {
                SystemIntent::update_permission(Intent::for_topic(topic).name())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub messages: Vec<String>,
    pub suggestions: Vec<String>,
    pub directive: Directive,
    pub helper: Option<Helper>,
}

impl Reply {
    pub fn ask(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            suggestions: Vec::new(),
            directive: Directive::Ask,
            helper: None,
        }
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            suggestions: Vec::new(),
            directive: Directive::Close,
            helper: None,
        }
    }

    pub fn with_suggestions(mut self, titles: &[&str]) -> Self {
        self.suggestions = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_helper(mut self, helper: Helper) -> Self {
        self.helper = Some(helper);
        self
    }

    pub fn is_closing(&self) -> bool {
        self.directive == Directive::Close
    }

    pub fn text(&self) -> String {
        self.messages.join(" ")
    }
}
