//! Wire-level message definitions for the WebSocket adapter.
//!
//! Notification events are wrapped in an envelope before being serialized to
//! JSON so clients can dispatch on the outer `type` discriminator.

use serde::{Deserialize, Serialize};

use crate::domain::NotificationEvent;

/// Inbound frames the server understands. Anything else is logged and
/// dropped without tearing the connection down.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Application-level keepalive for clients that cannot send protocol
    /// pings (browser WebSocket API).
    Ping,
}

/// Outbound frames sent to connected clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Pong,
    Notification { event: NotificationEvent },
}
