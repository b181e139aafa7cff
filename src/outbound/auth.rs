//! Static token verifier adapter.
//!
//! Stands in for the external credential service: a fixed token-to-identity
//! table built at startup. Real deployments would replace this adapter with
//! one that calls the credential collaborator; handlers only ever see the
//! [`TokenVerifier`] port.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::UserIdentity;
use crate::domain::ports::{TokenVerifier, TokenVerifierError};

/// Verifier resolving tokens against an immutable in-process table.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserIdentity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accepted token for the given identity.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, identity: UserIdentity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserIdentity>, TokenVerifierError> {
        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: UserId::random(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn resolves_known_token() {
        let identity = identity();
        let verifier = StaticTokenVerifier::new().with_token("secret", identity.clone());
        let resolved = verifier.verify("secret").await.expect("verify");
        assert_eq!(resolved, Some(identity));
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let verifier = StaticTokenVerifier::new().with_token("secret", identity());
        assert_eq!(verifier.verify("other").await.expect("verify"), None);
    }
}
