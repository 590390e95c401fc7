use chrono::Weekday;
use gymbot_protocol::{names, Context, WebhookRequest, WebhookResponse};
use gymbot_schedule::parse_day;
use tracing::debug;

use crate::error::Result;
use crate::intent::Intent;
use crate::reply::{Directive, Reply};
use crate::state::SessionState;

/// Slot parameter holding the requested day.
pub const DAY_PARAM: &str = "day";

/// Platform-supplied arguments the handlers read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformArgs {
    pub permission_granted: bool,
    pub updates_user_id: Option<String>,
    /// `REGISTER_UPDATE` came back with status `OK`.
    pub update_registered: bool,
    pub reprompt_count: i64,
    pub final_reprompt: bool,
    /// Turn was re-invoked by a scheduled daily update.
    pub from_daily_update: bool,
}

/// One decoded conversational turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub intent: Intent,
    /// Requested day, if the slot was filled with a recognisable day.
    pub day: Option<Weekday>,
    /// Current day of week at the time the turn arrived.
    pub today: Weekday,
    pub state: SessionState,
    pub args: PlatformArgs,
    pub conversation_id: Option<String>,
    /// Surface can display suggestion chips.
    pub screen: bool,
}

impl Turn {
    #[cfg(test)]
    pub(crate) fn new(intent: Intent, today: Weekday) -> Self {
        Self {
            intent,
            day: None,
            today,
            state: SessionState::default(),
            args: PlatformArgs::default(),
            conversation_id: None,
            screen: false,
        }
    }

    pub fn from_request(req: &WebhookRequest, today: Weekday) -> Result<Self> {
        let intent: Intent = req.intent_name().parse()?;

        let day = req.parameter_str(DAY_PARAM).and_then(|raw| {
            let parsed = parse_day(raw);
            if parsed.is_none() {
                debug!(value = %raw, "unrecognised day slot, using today");
            }
            parsed
        });

        let state = SessionState::from_data(
            req.context(names::CONVERSATION_CONTEXT)
                .and_then(|c| c.parameters.get("data"))
                .and_then(|v| v.as_str()),
        );

        let args = PlatformArgs {
            permission_granted: req
                .argument(names::ARG_PERMISSION)
                .and_then(|a| a.as_bool())
                .unwrap_or(false),
            updates_user_id: req
                .argument(names::ARG_UPDATES_USER_ID)
                .and_then(|a| a.as_text())
                .filter(|id| !id.is_empty())
                .map(String::from),
            update_registered: req
                .argument(names::ARG_REGISTER_UPDATE)
                .and_then(|a| a.extension_status())
                == Some("OK"),
            reprompt_count: req
                .argument(names::ARG_REPROMPT_COUNT)
                .and_then(|a| a.as_int())
                .unwrap_or(0),
            final_reprompt: req
                .argument(names::ARG_IS_FINAL_REPROMPT)
                .and_then(|a| a.as_bool())
                .unwrap_or(false),
            from_daily_update: req.argument(names::ARG_UPDATES).is_some(),
        };

        Ok(Self {
            intent,
            day,
            today,
            state,
            args,
            conversation_id: req.conversation_id().map(String::from),
            screen: req.has_screen(),
        })
    }

    /// Requested day, defaulting to today.
    pub fn resolved_day(&self) -> Weekday {
        self.day.unwrap_or(self.today)
    }
}

/// Encode a reply and the updated session state as the platform response.
pub fn encode_response(req: &WebhookRequest, reply: &Reply, state: &SessionState) -> WebhookResponse {
    let mut response = WebhookResponse::new(reply.directive == Directive::Ask, &reply.messages)
        .with_suggestions(&reply.suggestions);

    if let Some(helper) = reply.helper {
        response = response.with_system_intent(helper.to_system_intent());
    }

    let mut parameters = serde_json::Map::new();
    parameters.insert("data".to_string(), serde_json::Value::String(state.to_data()));
    response.with_context(Context {
        name: req.context_name(names::CONVERSATION_CONTEXT),
        lifespan_count: Some(names::CONVERSATION_CONTEXT_LIFESPAN),
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversationError;
    use crate::reply::Helper;
    use serde_json::json;

    fn request(intent: &str, parameters: serde_json::Value, arguments: serde_json::Value) -> WebhookRequest {
        serde_json::from_value(json!({
            "session": "projects/gym/agent/sessions/s1",
            "queryResult": {
                "intent": { "displayName": intent },
                "parameters": parameters,
                "outputContexts": [{
                    "name": "projects/gym/agent/sessions/s1/contexts/_actions_on_google",
                    "lifespanCount": 99,
                    "parameters": { "data": "{\"version\":1,\"fallbackCount\":2}" }
                }]
            },
            "originalDetectIntentRequest": {
                "source": "google",
                "payload": {
                    "conversation": { "conversationId": "conv-1" },
                    "inputs": [{ "intent": "actions.intent.TEXT", "arguments": arguments }],
                    "surface": { "capabilities": [{ "name": "actions.capability.SCREEN_OUTPUT" }] }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn decodes_intent_day_state_and_surface() {
        let req = request("Class List", json!({"day": "Wednesday"}), json!([]));
        let turn = Turn::from_request(&req, Weekday::Mon).unwrap();

        assert_eq!(turn.intent, Intent::ClassList);
        assert_eq!(turn.day, Some(Weekday::Wed));
        assert_eq!(turn.resolved_day(), Weekday::Wed);
        assert_eq!(turn.state.fallback_count, 2);
        assert_eq!(turn.conversation_id.as_deref(), Some("conv-1"));
        assert!(turn.screen);
    }

    #[test]
    fn missing_or_unrecognised_day_resolves_to_today() {
        let req = request("Class List", json!({}), json!([]));
        assert_eq!(Turn::from_request(&req, Weekday::Thu).unwrap().resolved_day(), Weekday::Thu);

        let req = request("Class List", json!({"day": "someday"}), json!([]));
        assert_eq!(Turn::from_request(&req, Weekday::Sat).unwrap().resolved_day(), Weekday::Sat);
    }

    #[test]
    fn decodes_platform_arguments() {
        let req = request(
            "Finish Push Setup",
            json!({}),
            json!([
                { "name": "PERMISSION", "boolValue": true },
                { "name": "UPDATES_USER_ID", "textValue": "push-user" },
                { "name": "REGISTER_UPDATE", "extension": { "status": "OK" } },
                { "name": "REPROMPT_COUNT", "intValue": 2 },
                { "name": "IS_FINAL_REPROMPT", "boolValue": true },
                { "name": "UPDATES", "textValue": "" }
            ]),
        );
        let args = Turn::from_request(&req, Weekday::Mon).unwrap().args;

        assert_eq!(
            args,
            PlatformArgs {
                permission_granted: true,
                updates_user_id: Some("push-user".into()),
                update_registered: true,
                reprompt_count: 2,
                final_reprompt: true,
                from_daily_update: true,
            }
        );
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let req = request("Order Smoothie", json!({}), json!([]));
        assert!(matches!(
            Turn::from_request(&req, Weekday::Mon),
            Err(ConversationError::UnknownIntent(_))
        ));
    }

    #[test]
    fn encode_writes_state_context_and_helper() {
        let req = request("Setup Updates", json!({}), json!([]));
        let reply = Reply::ask("Sure.").with_helper(Helper::DailyUpdate(Intent::ClassList));
        let state = SessionState::default();

        let value = serde_json::to_value(encode_response(&req, &reply, &state)).unwrap();
        assert_eq!(value["payload"]["google"]["expectUserResponse"], true);
        assert_eq!(
            value["payload"]["google"]["systemIntent"]["intent"],
            "actions.intent.REGISTER_UPDATE"
        );
        assert_eq!(
            value["outputContexts"][0]["name"],
            "projects/gym/agent/sessions/s1/contexts/_actions_on_google"
        );
        assert_eq!(
            value["outputContexts"][0]["parameters"]["data"],
            state.to_data()
        );
    }
}
