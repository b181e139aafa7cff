//! Bearer-token authentication extractor.
//!
//! Handlers that take an [`Identity`] argument only run once the caller's
//! `Authorization: Bearer <token>` header resolved to a known user. Missing,
//! malformed, or unknown tokens are rejected with a 401 before the handler
//! body executes.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use super::state::HttpState;
use crate::domain::{Error, UserIdentity, ports::TokenVerifierError};

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct Identity(pub UserIdentity);

impl Identity {
    pub fn into_inner(self) -> UserIdentity {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state
                .ok_or_else(|| Error::internal("application state is not configured"))?;
            let token =
                token.ok_or_else(|| Error::unauthorized("Missing or malformed bearer token"))?;
            match state.verifier.verify(&token).await {
                Ok(Some(identity)) => Ok(Identity(identity)),
                Ok(None) => Err(Error::unauthorized("Invalid or expired token")),
                Err(TokenVerifierError::Unavailable { message }) => {
                    warn!(%message, "token verifier unavailable");
                    Err(Error::internal("authentication backend unavailable"))
                }
            }
        })
    }
}
