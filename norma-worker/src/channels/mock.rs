/// Mock channel for testing
///
/// Records every notification it receives instead of delivering it, and
/// can be flipped into a failing mode to exercise the scanner's
/// log-and-continue behavior.
///
/// # Example
///
/// ```
/// use norma_worker::channels::{MockChannel, Notification, NotificationChannel};
/// use norma_shared::models::alert::Severity;
/// use uuid::Uuid;
///
/// # async fn example() {
/// let channel = MockChannel::new();
///
/// let notification = Notification {
///     organization_id: Uuid::new_v4(),
///     severity: Severity::Warning,
///     subject: "Instruiri care trebuie repetate".to_string(),
///     body: "5 instruiri expira in 30 de zile".to_string(),
/// };
///
/// channel.send(&notification).await.unwrap();
/// assert_eq!(channel.sent().len(), 1);
/// # }
/// ```

use crate::channels::{ChannelError, ChannelResult, Notification, NotificationChannel};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recording channel for tests
#[derive(Clone, Default)]
pub struct MockChannel {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockChannel {
    /// Creates a mock channel that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Returns a copy of everything sent so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(ChannelError::Delivery("mock channel failing".to_string()));
        }

        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use norma_shared::models::alert::Severity;
    use uuid::Uuid;

    fn notification() -> Notification {
        Notification {
            organization_id: Uuid::new_v4(),
            severity: Severity::Info,
            subject: "subiect".to_string(),
            body: "corp".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_sends() {
        let channel = MockChannel::new();

        channel.send(&notification()).await.unwrap();
        channel.send(&notification()).await.unwrap();

        assert_eq!(channel.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_failing_mode() {
        let channel = MockChannel::new();
        channel.set_failing(true);

        assert!(channel.send(&notification()).await.is_err());
        assert!(channel.sent().is_empty());

        channel.set_failing(false);
        channel.send(&notification()).await.unwrap();
        assert_eq!(channel.sent().len(), 1);
    }
}
