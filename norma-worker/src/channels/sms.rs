/// SMS delivery channel
///
/// Posts a short text rendering of the notification to an SMS gateway.
/// Only the subject is sent; SMS bodies are capped by the gateway anyway.

use crate::channels::{ChannelError, ChannelResult, Notification, NotificationChannel};
use async_trait::async_trait;
use serde_json::json;

/// SMS channel backed by an HTTP gateway
pub struct SmsChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SmsChannel {
    /// Creates an SMS channel
    pub fn new(endpoint: String, api_key: String) -> Self {
        SmsChannel {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &str {
        "sms"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "organization_id": notification.organization_id,
                "message": notification.subject,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Delivery(format!("SMS request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChannelError::Delivery(format!(
                "SMS gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
