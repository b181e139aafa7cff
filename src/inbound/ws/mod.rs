//! WebSocket inbound adapter delivering notification events to clients.
//!
//! Responsibilities:
//! - resolve the caller's identity from the upgrade request's query string
//! - initialise the per-connection session task
//! - keep WebSocket-specific concerns at the edge of the system
//!
//! Connections that cannot be tied to a user are still upgraded; they get
//! heartbeats and pongs but never any notifications.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use serde::Deserialize;
use tracing::{error, info, warn};

mod session;

pub mod messages;
pub mod state;

use crate::domain::UserId;

/// Query parameters accepted on the upgrade request. Browsers cannot set
/// headers on WebSocket connects, so credentials travel in the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WsHandshake {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    query: web::Query<WsHandshake>,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let user = resolve_user(&state, &query).await;

    let (response, session, message_stream) =
        actix_ws::handle(&req, stream).inspect_err(|error| {
            error!(error = %error, "WebSocket upgrade failed");
        })?;

    match user {
        Some(id) => info!(user = %id, "WebSocket connection established"),
        None => info!("unauthenticated WebSocket connection established"),
    }

    let registry = state.registry.clone();
    actix_web::rt::spawn(session::handle_ws_session(
        registry,
        user,
        session,
        message_stream,
    ));
    Ok(response)
}

/// Resolve the connection's user, most explicit credential first.
///
/// An explicit `userId` wins over a `token`; a credential that fails to
/// resolve falls through to the next one rather than failing the upgrade.
async fn resolve_user(state: &state::WsState, query: &WsHandshake) -> Option<UserId> {
    if let Some(raw) = query.user_id.as_deref() {
        match UserId::new(raw) {
            Ok(id) => return Some(id),
            Err(error) => {
                warn!(error = %error, "ignoring malformed userId on WebSocket connect");
            }
        }
    }

    if let Some(token) = query.token.as_deref() {
        match state.verifier.verify(token).await {
            Ok(Some(identity)) => return Some(identity.id),
            Ok(None) => warn!("ignoring unknown token on WebSocket connect"),
            Err(error) => {
                warn!(error = %error, "token verifier unavailable during WebSocket connect");
            }
        }
    }

    None
}
