use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::names;

/// Platform → webhook request.
/// Wire: `{ "session": "...", "queryResult": {...}, "originalDetectIntentRequest": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: String,
    /// Full session path, e.g. `projects/p/agent/sessions/abc`.
    #[serde(default)]
    pub session: String,
    pub query_result: QueryResult,
    #[serde(default)]
    pub original_detect_intent_request: Option<OriginalRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: String,
    /// Slot values extracted by the platform, keyed by parameter name.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub intent: IntentRef,
    #[serde(default)]
    pub output_contexts: Vec<Context>,
    #[serde(default)]
    pub language_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub name: String,
    pub display_name: String,
}

/// A platform context, used both inbound and outbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalRequest {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub payload: AssistantPayload,
}

/// The assistant-specific part of the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPayload {
    #[serde(default)]
    pub conversation: Option<Conversation>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub surface: Option<Surface>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub conversation_id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

/// A platform-supplied argument. Exactly one of the value fields is usually set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    /// int64 values arrive either as JSON numbers or as decimal strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Value>,
}

impl Argument {
    pub fn as_bool(&self) -> Option<bool> {
        self.bool_value
    }

    pub fn as_text(&self) -> Option<&str> {
        self.text_value.as_deref()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.int_value.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// `extension.status` for helper results such as REGISTER_UPDATE.
    pub fn extension_status(&self) -> Option<&str> {
        self.extension.as_ref()?.get("status")?.as_str()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Surface {
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
}

impl WebhookRequest {
    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    /// String value of a slot parameter. Empty strings count as absent.
    pub fn parameter_str(&self, name: &str) -> Option<&str> {
        self.query_result
            .parameters
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn payload(&self) -> Option<&AssistantPayload> {
        self.original_detect_intent_request
            .as_ref()
            .map(|r| &r.payload)
    }

    /// Look up a platform argument by name across all inputs.
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.payload()?
            .inputs
            .iter()
            .flat_map(|input| input.arguments.iter())
            .find(|arg| arg.name == name)
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.payload()?
            .conversation
            .as_ref()
            .map(|c| c.conversation_id.as_str())
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.payload()
            .and_then(|p| p.surface.as_ref())
            .map(|s| s.capabilities.iter().any(|c| c.name == name))
            .unwrap_or(false)
    }

    pub fn has_screen(&self) -> bool {
        self.has_capability(names::CAP_SCREEN_OUTPUT)
    }

    /// Find an inbound context whose name ends in `/contexts/{short_name}`.
    pub fn context(&self, short_name: &str) -> Option<&Context> {
        let suffix = format!("/contexts/{short_name}");
        self.query_result
            .output_contexts
            .iter()
            .find(|c| c.name.ends_with(&suffix))
    }

    /// Full context name for `short_name` within this session.
    pub fn context_name(&self, short_name: &str) -> String {
        format!("{}/contexts/{}", self.session, short_name)
    }
}
