//! Port abstraction for delivering notification events to a user's
//! live channels.

use async_trait::async_trait;

use crate::domain::{NotificationEvent, UserId};

/// Delivery failures raised by notifier adapters.
///
/// The in-process fan-out adapter never fails (closed channels are simply
/// skipped); the error exists so callers can log-and-continue when an
/// adapter with a real transport does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("notification delivery failed: {message}")]
    Delivery { message: String },
}

impl PublishError {
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }
}

/// Best-effort fan-out of an event to every channel of one user.
///
/// Delivery is fire-and-forget: no retry, no persistence, no
/// acknowledgement, and no ordering guarantee across channels. Publishing
/// to a user with no live channels is a silent no-op.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, user: &UserId, event: NotificationEvent) -> Result<(), PublishError>;
}
