//! Service account credentials and access-token minting.
//!
//! Auth flow:
//!   1. Read the service account JSON key file from disk.
//!   2. Sign a JWT with RS256 (using `ring`) for the conversation-send scope.
//!   3. Exchange it at the key's `token_uri` for a short-lived access token.
//!
//! Tokens are minted once per dispatch batch and not cached across batches.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::signature::{self, RsaKeyPair};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PushError, Result};

pub const PUSH_SCOPE: &str = "https://www.googleapis.com/auth/actions.fulfillment.conversation";

/// Bearer token for the push API. The value is never printed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Parsed service account key.
#[derive(Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    pub token_uri: String,
    private_key_der: Vec<u8>,
}

/// Raw JSON structure of a service account key file.
#[derive(Deserialize)]
struct ServiceAccountJson {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccount {
    pub fn from_file(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PushError::Credentials(format!("cannot read service account key: {e}")))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let sa: ServiceAccountJson = serde_json::from_str(data)
            .map_err(|e| PushError::Credentials(format!("invalid service account JSON: {e}")))?;
        Ok(Self {
            client_email: sa.client_email,
            token_uri: sa.token_uri,
            private_key_der: pem_to_der(&sa.private_key)?,
        })
    }

    /// Build and sign the JWT assertion for the token exchange.
    fn signed_assertion(&self, now: i64) -> Result<String> {
        let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
        let claims = serde_json::json!({
            "iss": self.client_email,
            "scope": PUSH_SCOPE,
            "aud": self.token_uri,
            "iat": now,
            "exp": now + 3600,
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string().as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        let message = format!("{header_b64}.{claims_b64}");

        let key_pair = RsaKeyPair::from_pkcs8(&self.private_key_der)
            .map_err(|e| PushError::Credentials(format!("invalid RSA private key: {e}")))?;
        let mut sig = vec![0u8; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                message.as_bytes(),
                &mut sig,
            )
            .map_err(|e| PushError::Credentials(format!("RSA signing failed: {e}")))?;

        Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(&sig)))
    }

    /// Exchange a freshly signed JWT for an access token.
    pub async fn mint_token(&self, client: &reqwest::Client) -> Result<AccessToken> {
        let jwt = self.signed_assertion(chrono::Utc::now().timestamp())?;

        info!(client_email = %self.client_email, "exchanging service account JWT for push token");
        let resp = client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(PushError::Auth(format!("{status}: {text}")));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PushError::Auth(format!("malformed token response: {e}")))?;
        debug!(expires_in = token.expires_in, "push access token obtained");
        Ok(AccessToken::new(token.access_token))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Decode a PEM-encoded PKCS#8 private key to DER bytes.
fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    use base64::engine::general_purpose::STANDARD;

    let b64: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect::<Vec<_>>()
        .join("");

    STANDARD
        .decode(b64.trim())
        .map_err(|e| PushError::Credentials(format!("invalid PEM base64: {e}")))
}
