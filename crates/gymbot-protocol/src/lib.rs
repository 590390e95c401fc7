//! Wire types for the dialog platform's fulfillment webhook.
//!
//! Inbound requests follow the Dialogflow v2 `WebhookRequest` shape with an
//! Actions-on-Google payload under `originalDetectIntentRequest`. Outbound
//! responses carry an Actions-on-Google rich response under `payload.google`.

pub mod names;
pub mod request;
pub mod response;

pub use request::{Argument, Context, WebhookRequest};
pub use response::{SystemIntent, WebhookResponse};
