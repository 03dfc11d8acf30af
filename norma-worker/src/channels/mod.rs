/// Notification delivery channels
///
/// The scanner pushes alert notifications through every configured channel.
/// Each channel is a single-attempt HTTP client for one provider kind:
///
/// - [`EmailChannel`]: transactional email provider
/// - [`SmsChannel`]: SMS gateway
/// - [`PushChannel`]: mobile push relay
/// - [`MockChannel`]: in-memory recorder for tests

mod channel;
mod email;
mod mock;
mod push;
mod sms;

pub use channel::{ChannelError, ChannelResult, Notification, NotificationChannel};
pub use email::EmailChannel;
pub use mock::MockChannel;
pub use push::PushChannel;
pub use sms::SmsChannel;
