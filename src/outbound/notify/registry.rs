//! Volatile registry of live notification channels per user.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{NotificationEvent, UserId};

/// Identifier distinguishing channels of the same user (one per tab or
/// device).
pub type ConnectionId = Uuid;

/// Sending side of one live connection's event queue.
///
/// Cloneable so the registry can hand out snapshots while the owning
/// session keeps its own copy alive.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelHandle {
    pub fn new(sender: mpsc::UnboundedSender<NotificationEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an event on the channel; `false` when the receiving session
    /// has already gone away.
    pub fn push(&self, event: NotificationEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Concurrent map from user id to that user's live channels.
///
/// Entirely in-memory: entries appear when an authenticated connection
/// registers and disappear when it closes, errors, or is pruned after a
/// failed push. Restarting the process starts from an empty registry.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: RwLock<HashMap<UserId, HashMap<ConnectionId, ChannelHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel for the user; registering the same handle twice is a
    /// no-op.
    pub fn register(&self, user: &UserId, handle: ChannelHandle) {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        let entry = channels.entry(*user).or_default();
        let connection = handle.id();
        entry.entry(connection).or_insert(handle);
        debug!(user = %user, connection = %connection, live = entry.len(), "channel registered");
    }

    /// Remove one channel; the user entry is dropped once empty.
    pub fn unregister(&self, user: &UserId, connection: ConnectionId) {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = channels.get_mut(user) {
            entry.remove(&connection);
            if entry.is_empty() {
                channels.remove(user);
            }
            debug!(user = %user, connection = %connection, "channel unregistered");
        }
    }

    /// Snapshot of the user's current channels; safe to iterate while
    /// sessions register and unregister concurrently.
    pub fn channels_for(&self, user: &UserId) -> Vec<ChannelHandle> {
        self.channels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(user)
            .map(|entry| entry.values().cloned().collect())
            .unwrap_or_default()
    }
}
