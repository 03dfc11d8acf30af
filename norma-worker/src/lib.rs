//! # Norma Scanner Worker Library
//!
//! This library provides the scheduled expiry scan and the notification
//! channels it delivers through. The API server reuses the scan engine for
//! its cron-triggered endpoint.
//!
//! ## Modules
//!
//! - `scanner`: the expiry scan loop and one-shot scan
//! - `channels`: notification delivery (email, SMS, push, mock)
//! - `config`: environment-based worker configuration

pub mod channels;
pub mod config;
pub mod scanner;

/// Builds the channel set from configuration
///
/// Only channels with a configured endpoint are constructed. A missing API
/// key with configured endpoints is a configuration error.
pub fn build_channels(
    notifications: &config::NotificationsConfig,
) -> anyhow::Result<Vec<std::sync::Arc<dyn channels::NotificationChannel>>> {
    use std::sync::Arc;

    let mut built: Vec<Arc<dyn channels::NotificationChannel>> = Vec::new();

    let any_endpoint = notifications.email_endpoint.is_some()
        || notifications.sms_endpoint.is_some()
        || notifications.push_endpoint.is_some();

    if !any_endpoint {
        return Ok(built);
    }

    let api_key = notifications
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("NOTIFY_API_KEY is required when a notification endpoint is set"))?;

    if let Some(endpoint) = &notifications.email_endpoint {
        built.push(Arc::new(channels::EmailChannel::new(
            endpoint.clone(),
            api_key.clone(),
        )));
    }
    if let Some(endpoint) = &notifications.sms_endpoint {
        built.push(Arc::new(channels::SmsChannel::new(
            endpoint.clone(),
            api_key.clone(),
        )));
    }
    if let Some(endpoint) = &notifications.push_endpoint {
        built.push(Arc::new(channels::PushChannel::new(
            endpoint.clone(),
            api_key,
        )));
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_channels_empty_without_endpoints() {
        let config = config::NotificationsConfig {
            email_endpoint: None,
            sms_endpoint: None,
            push_endpoint: None,
            api_key: None,
        };

        assert!(build_channels(&config).unwrap().is_empty());
    }

    #[test]
    fn test_build_channels_requires_api_key() {
        let config = config::NotificationsConfig {
            email_endpoint: Some("https://mail.example.com/send".to_string()),
            sms_endpoint: None,
            push_endpoint: None,
            api_key: None,
        };

        assert!(build_channels(&config).is_err());
    }

    #[test]
    fn test_build_channels_constructs_configured_set() {
        let config = config::NotificationsConfig {
            email_endpoint: Some("https://mail.example.com/send".to_string()),
            sms_endpoint: Some("https://sms.example.com/send".to_string()),
            push_endpoint: None,
            api_key: Some("key".to_string()),
        };

        let channels = build_channels(&config).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name(), "email");
        assert_eq!(channels[1].name(), "sms");
    }
}
