/// Notification channel contract
///
/// A channel delivers one alert notification to an external provider
/// (email, SMS, push). Channels get exactly one attempt per notification:
/// the scanner logs a failed delivery and moves on, it never retries or
/// escalates. The next daily scan produces a fresh notification anyway.
///
/// # Example
///
/// ```no_run
/// use norma_worker::channels::{Notification, NotificationChannel};
/// use norma_shared::models::alert::Severity;
/// use async_trait::async_trait;
/// use uuid::Uuid;
///
/// struct LogChannel;
///
/// #[async_trait]
/// impl NotificationChannel for LogChannel {
///     fn name(&self) -> &str {
///         "log"
///     }
///
///     async fn send(&self, notification: &Notification) -> norma_worker::channels::ChannelResult<()> {
///         println!("{}: {}", notification.subject, notification.body);
///         Ok(())
///     }
/// }
/// ```

use async_trait::async_trait;
use norma_shared::models::alert::Severity;
use uuid::Uuid;

/// Channel delivery error
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Provider rejected or failed the delivery
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Channel is misconfigured (bad endpoint, missing key)
    #[error("Invalid channel configuration: {0}")]
    InvalidConfig(String),
}

/// Channel result type alias
pub type ChannelResult<T> = Result<T, ChannelError>;

/// One notification produced from an alert
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    /// Organization the notification targets
    pub organization_id: Uuid,

    /// Severity of the underlying alert
    pub severity: Severity,

    /// Subject line (Romanian)
    pub subject: String,

    /// Body text (Romanian)
    pub body: String,
}

/// Contract implemented by every delivery channel
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Returns the channel name, used for logging
    fn name(&self) -> &str;

    /// Delivers one notification
    ///
    /// One attempt only; the caller decides what a failure means.
    async fn send(&self, notification: &Notification) -> ChannelResult<()>;
}
