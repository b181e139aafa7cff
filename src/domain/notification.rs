//! Ephemeral notification events pushed over live connections.
//!
//! Events are best-effort: never persisted, lost when a connection closes,
//! and reconstructed from nothing on restart. Clients may cache them for
//! display but the backend keeps no record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Severity/intent of a notification, mirroring the client toast levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    /// Reserved for future flows; nothing currently emits it.
    Error,
}

/// Payload delivered to every live channel of the targeted user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    /// The job the event refers to, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

impl NotificationEvent {
    /// Build an event stamped with a fresh id and the current instant.
    pub fn new(kind: NotificationKind, message: impl Into<String>, job_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            job_id,
        }
    }
}
