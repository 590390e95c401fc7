//! Request authentication for the fulfillment endpoint.
//!
//! The mode comes from `webhook.auth_mode`; a mode that needs a secret but
//! has none configured rejects every request.

use axum::http::HeaderMap;
use gymbot_core::config::{WebhookAuthMode, WebhookConfig};
use gymbot_core::GymbotError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn authenticate(
    config: &WebhookConfig,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), GymbotError> {
    let result = match config.auth_mode {
        WebhookAuthMode::HmacSha256 => verify_hmac_sha256(headers, body, config.secret.as_deref()),
        WebhookAuthMode::BearerToken => verify_bearer_token(headers, config.secret.as_deref()),
        WebhookAuthMode::None => Ok(()),
    };
    result.map_err(GymbotError::AuthFailed)
}

/// HMAC-SHA256 over the raw body: `sha256=<hex>` in X-Hub-Signature-256.
fn verify_hmac_sha256(headers: &HeaderMap, body: &[u8], secret: Option<&str>) -> Result<(), String> {
    let secret = secret.ok_or_else(|| "no HMAC secret configured".to_string())?;

    let sig_header = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| "missing X-Hub-Signature-256 header".to_string())?;

    let sig_hex = sig_header
        .strip_prefix("sha256=")
        .ok_or_else(|| "malformed X-Hub-Signature-256 header".to_string())?;

    let expected =
        hex::decode(sig_hex).map_err(|_| "X-Hub-Signature-256 is not valid hex".to_string())?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "invalid HMAC key length".to_string())?;
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| "HMAC signature mismatch".to_string())
}

/// Static token in `Authorization: Bearer <token>`.
fn verify_bearer_token(headers: &HeaderMap, secret: Option<&str>) -> Result<(), String> {
    let expected = secret.ok_or_else(|| "no bearer token configured".to_string())?;

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| "missing Authorization header".to_string())?
        .strip_prefix("Bearer ")
        .ok_or_else(|| "Authorization header must use Bearer scheme".to_string())?;

    if token == expected {
        Ok(())
    } else {
        Err("bearer token mismatch".to_string())
    }
}
