//! Port abstraction for the external credential collaborator.
//!
//! Token issuance and storage are out of scope; the domain only needs to
//! turn an opaque bearer token into a [`UserIdentity`], or learn that the
//! token resolves to nothing.

use async_trait::async_trait;

use crate::domain::UserIdentity;

/// Failures raised by token verifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerifierError {
    /// The credential collaborator could not be reached.
    #[error("credential verifier unavailable: {message}")]
    Unavailable { message: String },
}

impl TokenVerifierError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Resolve an opaque bearer token to a user identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Ok(None)` means the token is unknown, expired, or revoked; `Err`
    /// is reserved for collaborator failures.
    async fn verify(&self, token: &str) -> Result<Option<UserIdentity>, TokenVerifierError>;
}
