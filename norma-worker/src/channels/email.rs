/// Email delivery channel
///
/// Posts notifications as JSON to a transactional email provider endpoint.
/// The provider resolves the organization's recipient list from its own
/// contact data; this channel only ships the content.

use crate::channels::{ChannelError, ChannelResult, Notification, NotificationChannel};
use async_trait::async_trait;
use serde_json::json;

/// Email channel backed by an HTTP provider API
pub struct EmailChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EmailChannel {
    /// Creates an email channel
    pub fn new(endpoint: String, api_key: String) -> Self {
        EmailChannel {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "organization_id": notification.organization_id,
                "subject": notification.subject,
                "text": notification.body,
                "tag": format!("alert-{}", notification.severity.as_str()),
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Delivery(format!("Email request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChannelError::Delivery(format!(
                "Email provider returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
