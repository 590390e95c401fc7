//! Fulfillment endpoint: POST /fulfillment.
//!
//! One platform turn per request: authenticate, decode, route, encode.
//! A push batch started by the turn runs detached; the reply never waits on it.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Datelike;
use gymbot_conversation::turn::encode_response;
use gymbot_conversation::{ConversationError, Turn};
use gymbot_core::GymbotError;
use gymbot_protocol::{WebhookRequest, WebhookResponse};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::http::auth;

/// POST /fulfillment
///
/// Returns 200 + the platform response on success, 401 on auth failure,
/// 400 for requests we can't act on, 500 when our own data or storage fails.
pub async fn fulfillment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, (StatusCode, Json<Value>)> {
    auth::authenticate(&state.config.webhook, &headers, &body).map_err(error_response)?;

    let req: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| error_response(GymbotError::from(e)))?;

    let today = chrono::Local::now().weekday();
    let turn = Turn::from_request(&req, today).map_err(|e| error_response(turn_error(e)))?;
    info!(intent = %turn.intent, session = %req.session, "turn arrived");

    let outcome = state
        .turns
        .handle(turn)
        .map_err(|e| error_response(turn_error(e)))?;

    // dropping the handle detaches the batch
    if outcome.dispatch.is_some() {
        info!("notification batch running in background");
    }

    Ok(Json(encode_response(&req, &outcome.reply, &outcome.state)))
}

fn turn_error(e: ConversationError) -> GymbotError {
    if e.is_client_error() {
        GymbotError::BadRequest(e.to_string())
    } else {
        GymbotError::Internal(e.to_string())
    }
}

fn error_response(e: GymbotError) -> (StatusCode, Json<Value>) {
    let status = match e {
        GymbotError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
        _ if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "turn failed");
    } else {
        warn!(error = %e, status = status.as_u16(), "turn rejected");
    }
    (
        status,
        Json(json!({"error": e.to_string(), "code": e.code()})),
    )
}
