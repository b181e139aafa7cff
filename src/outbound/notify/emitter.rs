//! Fan-out notifier over the connection registry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::domain::ports::{Notifier, PublishError};
use crate::domain::{NotificationEvent, UserId};
use crate::outbound::notify::ConnectionRegistry;

/// Delivers each event to every live channel of the targeted user.
///
/// Delivery per channel is a non-blocking queue push: a slow session never
/// delays the others, and a channel whose session just closed is pruned
/// from the registry instead of raising an error. An empty snapshot is a
/// silent no-op.
#[derive(Clone)]
pub struct FanoutNotifier {
    registry: Arc<ConnectionRegistry>,
}

impl FanoutNotifier {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Notifier for FanoutNotifier {
    async fn publish(&self, user: &UserId, event: NotificationEvent) -> Result<(), PublishError> {
        let channels = self.registry.channels_for(user);
        if channels.is_empty() {
            trace!(user = %user, "no live channels; dropping notification");
            return Ok(());
        }

        let mut delivered = 0usize;
        for channel in channels {
            if channel.push(event.clone()) {
                delivered += 1;
            } else {
                // The session closed between snapshot and push.
                debug!(user = %user, connection = %channel.id(), "pruning closed channel");
                self.registry.unregister(user, channel.id());
            }
        }
        debug!(user = %user, delivered, event = %event.id, "notification fanned out");
        Ok(())
    }
}
