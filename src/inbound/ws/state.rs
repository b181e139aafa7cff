//! Shared WebSocket adapter state.
//!
//! The upgrade handler depends on the connection registry and the token
//! verifier port rather than concrete services, keeping the adapter testable
//! with deterministic doubles.

use std::sync::Arc;

use crate::domain::ports::TokenVerifier;
use crate::outbound::notify::ConnectionRegistry;

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    pub registry: Arc<ConnectionRegistry>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl WsState {
    pub fn new(registry: Arc<ConnectionRegistry>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { registry, verifier }
    }
}
