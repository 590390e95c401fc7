use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::names;
use crate::request::Context;

/// Webhook → platform response.
/// Wire: `{ "payload": { "google": {...} }, "outputContexts": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub payload: ResponsePayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_contexts: Vec<Context>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub google: GooglePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    /// `true` keeps the microphone open; `false` ends the conversation.
    pub expect_user_response: bool,
    pub rich_response: RichResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichResponse {
    pub items: Vec<RichItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichItem {
    pub simple_response: SimpleResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub text_to_speech: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
}

/// Hand the turn to a platform helper flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemIntent {
    pub intent: String,
    pub data: Value,
}

impl SystemIntent {
    /// Ask the platform to re-invoke `intent` on the user's behalf every day.
    pub fn register_daily_update(intent: &str) -> Self {
        Self {
            intent: names::SYSTEM_INTENT_REGISTER_UPDATE.to_string(),
            data: json!({
                "@type": "type.googleapis.com/google.actions.v2.RegisterUpdateValueSpec",
                "intent": intent,
                "triggerContext": { "timeContext": { "frequency": "DAILY" } },
            }),
        }
    }

    /// Ask the user for permission to send push notifications that open `intent`.
    pub fn update_permission(intent: &str) -> Self {
        Self {
            intent: names::SYSTEM_INTENT_PERMISSION.to_string(),
            data: json!({
                "@type": "type.googleapis.com/google.actions.v2.PermissionValueSpec",
                "permissions": ["UPDATE"],
                "updatePermissionValueSpec": { "intent": intent },
            }),
        }
    }
}

impl WebhookResponse {
    pub fn new(expect_user_response: bool, messages: &[String]) -> Self {
        Self {
            payload: ResponsePayload {
                google: GooglePayload {
                    expect_user_response,
                    rich_response: RichResponse {
                        items: messages
                            .iter()
                            .map(|m| RichItem {
                                simple_response: SimpleResponse {
                                    text_to_speech: m.clone(),
                                },
                            })
                            .collect(),
                        suggestions: Vec::new(),
                    },
                    system_intent: None,
                },
            },
            output_contexts: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, titles: &[String]) -> Self {
        self.payload.google.rich_response.suggestions = titles
            .iter()
            .map(|t| Suggestion { title: t.clone() })
            .collect();
        self
    }

    pub fn with_system_intent(mut self, intent: SystemIntent) -> Self {
        self.payload.google.system_intent = Some(intent);
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.output_contexts.push(context);
        self
    }
}
