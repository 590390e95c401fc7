use std::sync::Arc;

use gymbot_subscriptions::{SubscriberStore, Topic};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use crate::client::PushTransport;
use crate::credentials::AccessToken;
use crate::error::Result;
use crate::notification::Notification;

/// Outcome of one dispatch batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub batch_id: String,
    pub topic: Topic,
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Fans a notification out to every subscriber of a topic.
pub struct Dispatcher {
    store: Arc<dyn SubscriberStore>,
    transport: Arc<dyn PushTransport>,
    title: String,
    locale: String,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        transport: Arc<dyn PushTransport>,
        title: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            title: title.into(),
            locale: locale.into(),
        }
    }

    /// Start a batch in the background and return immediately.
    ///
    /// The handle may be dropped; the batch keeps running and logs its own
    /// outcome. Aborting failures are logged at error level.
    pub fn spawn(self: &Arc<Self>, topic: Topic) -> JoinHandle<Result<DispatchReport>> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.run(topic).await;
            if let Err(ref e) = result {
                error!(topic = %topic, error = %e, "dispatch batch aborted");
            }
            result
        })
    }

    /// Run one batch to completion.
    pub async fn run(&self, topic: Topic) -> Result<DispatchReport> {
        let batch_id = uuid::Uuid::new_v4().to_string();

        // One token for the whole batch, acquired before any send.
        let token = Arc::new(self.transport.authorize().await?);
        let subscribers = self.store.find_by_topic(topic)?;
        info!(batch_id = %batch_id, topic = %topic, subscribers = subscribers.len(), "dispatching");

        let mut tasks = JoinSet::new();
        for subscriber in subscribers {
            let notification = Notification {
                title: self.title.clone(),
                user_id: subscriber.user_id,
                topic,
                locale: self.locale.clone(),
            };
            let transport = Arc::clone(&self.transport);
            let token: Arc<AccessToken> = Arc::clone(&token);
            tasks.spawn(async move {
                let outcome = transport.send(&token, &notification).await;
                (notification.user_id, outcome)
            });
        }

        let mut report = DispatchReport {
            batch_id,
            topic,
            attempted: tasks.len(),
            delivered: 0,
            failed: 0,
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => report.delivered += 1,
                Ok((user_id, Err(e))) => {
                    report.failed += 1;
                    warn!(batch_id = %report.batch_id, user_id = %user_id, error = %e, "notification delivery failed");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(batch_id = %report.batch_id, error = %e, "delivery task panicked");
                }
            }
        }

        info!(
            batch_id = %report.batch_id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "dispatch batch complete"
        );
        Ok(report)
    }
}
