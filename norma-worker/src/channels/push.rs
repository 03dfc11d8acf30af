/// Push notification channel
///
/// Posts notifications to the mobile push relay, which fans out to the
/// organization's registered devices.

use crate::channels::{ChannelError, ChannelResult, Notification, NotificationChannel};
use async_trait::async_trait;
use serde_json::json;

/// Push channel backed by the mobile relay endpoint
pub struct PushChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PushChannel {
    /// Creates a push channel
    pub fn new(endpoint: String, api_key: String) -> Self {
        PushChannel {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl NotificationChannel for PushChannel {
    fn name(&self) -> &str {
        "push"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "organization_id": notification.organization_id,
                "title": notification.subject,
                "body": notification.body,
                "severity": notification.severity,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Delivery(format!("Push request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChannelError::Delivery(format!(
                "Push relay returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
