//! Live-connection notification adapters.
//!
//! [`ConnectionRegistry`] holds the volatile user → channel mapping that
//! WebSocket sessions maintain; [`FanoutNotifier`] implements the domain's
//! [`Notifier`] port on top of it. Both are plain injected objects built at
//! startup — there is no process-wide singleton.
//!
//! [`Notifier`]: crate::domain::ports::Notifier

mod emitter;
mod registry;

pub use emitter::FanoutNotifier;
pub use registry::{ChannelHandle, ConnectionId, ConnectionRegistry};
