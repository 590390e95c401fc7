use gymbot_subscriptions::Topic;
use serde::Serialize;

/// One push notification, built per subscriber at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub user_id: String,
    /// Intent the notification opens when tapped.
    pub topic: Topic,
    pub locale: String,
}

/// Wire body for `conversations:send`.
/// `{ "customPushMessage": { "userNotification": {...}, "target": {...} }, "isInSandbox": true }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest<'a> {
    custom_push_message: CustomPushMessage<'a>,
    is_in_sandbox: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomPushMessage<'a> {
    user_notification: UserNotification<'a>,
    target: Target<'a>,
}

#[derive(Debug, Serialize)]
struct UserNotification<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Target<'a> {
    user_id: &'a str,
    intent: &'a str,
    locale: &'a str,
}

impl Notification {
    pub fn to_request(&self, sandbox: bool) -> SendRequest<'_> {
        SendRequest {
            custom_push_message: CustomPushMessage {
                user_notification: UserNotification { title: &self.title },
                target: Target {
                    user_id: &self.user_id,
                    intent: self.topic.as_str(),
                    locale: &self.locale,
                },
            },
            is_in_sandbox: sandbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_wire_shape() {
        let n = Notification {
            title: "Class update".into(),
            user_id: "user-9".into(),
            topic: Topic::ClassCanceled,
            locale: "en-US".into(),
        };
        let value = serde_json::to_value(n.to_request(true)).unwrap();

        assert_eq!(value["isInSandbox"], true);
        let msg = &value["customPushMessage"];
        assert_eq!(msg["userNotification"]["title"], "Class update");
        assert_eq!(msg["target"]["userId"], "user-9");
        assert_eq!(msg["target"]["intent"], "Class Canceled");
        assert_eq!(msg["target"]["locale"], "en-US");
    }
}
