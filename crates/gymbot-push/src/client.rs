use async_trait::async_trait;
use gymbot_core::config::PushConfig;
use tracing::{debug, warn};

use crate::credentials::{AccessToken, ServiceAccount};
use crate::error::{PushError, Result};
use crate::notification::Notification;

/// Outbound side of the push API.
///
/// `authorize` runs once per dispatch batch; its token is shared by every
/// `send` in that batch.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn authorize(&self) -> Result<AccessToken>;

    async fn send(&self, token: &AccessToken, notification: &Notification) -> Result<()>;
}

/// `conversations:send` client authenticated with a service account.
pub struct ActionsPushClient {
    client: reqwest::Client,
    endpoint: String,
    sandbox: bool,
    /// `None` when no key file is configured; every batch then fails to authorize.
    account: Option<ServiceAccount>,
}

impl ActionsPushClient {
    pub fn new(endpoint: impl Into<String>, sandbox: bool, account: Option<ServiceAccount>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            sandbox,
            account,
        }
    }

    /// Build from config. A configured key file must be readable and valid.
    pub fn from_config(config: &PushConfig) -> Result<Self> {
        let account = match config.key_file.as_deref() {
            Some(path) => Some(ServiceAccount::from_file(path)?),
            None => None,
        };
        Ok(Self::new(config.endpoint.clone(), config.sandbox, account))
    }
}

#[async_trait]
impl PushTransport for ActionsPushClient {
    async fn authorize(&self) -> Result<AccessToken> {
        let account = self.account.as_ref().ok_or_else(|| {
            PushError::NotConfigured("set push.key_file to a service account key".into())
        })?;
        account.mint_token(&self.client).await
    }

    async fn send(&self, token: &AccessToken, notification: &Notification) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.as_str())
            .json(&notification.to_request(self.sandbox))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "push API rejected notification");
            return Err(PushError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!(status = status.as_u16(), user_id = %notification.user_id, "notification sent");
        Ok(())
    }
}
