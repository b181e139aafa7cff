//! HTTP server configuration from the environment.
//!
//! `JOBTRACK_BIND` sets the listen address (default `0.0.0.0:8080`).
//! `JOBTRACK_DEV_TOKEN` registers one bearer token with the in-process
//! verifier so the API is usable without an external identity provider;
//! `JOBTRACK_DEV_USER_ID`, `JOBTRACK_DEV_USER_NAME` and
//! `JOBTRACK_DEV_USER_EMAIL` describe the identity that token resolves to.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

use jobtrack::domain::{UserId, UserIdentity};

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) dev_token: Option<(String, UserIdentity)>,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> std::io::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> std::io::Result<Self> {
        let bind_addr = parse_bind(lookup("JOBTRACK_BIND"))?;
        let dev_token = lookup("JOBTRACK_DEV_TOKEN").map(|token| {
            let identity = dev_identity(
                lookup("JOBTRACK_DEV_USER_ID"),
                lookup("JOBTRACK_DEV_USER_NAME"),
                lookup("JOBTRACK_DEV_USER_EMAIL"),
            );
            (token, identity)
        });
        Ok(Self {
            bind_addr,
            dev_token,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn parse_bind(raw: Option<String>) -> std::io::Result<SocketAddr> {
    let raw = raw.unwrap_or_else(|| DEFAULT_BIND.to_owned());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid JOBTRACK_BIND {raw:?}: {e}")))
}

fn dev_identity(
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
) -> UserIdentity {
    let id = match id.as_deref().map(UserId::new) {
        Some(Ok(id)) => id,
        Some(Err(error)) => {
            warn!(error = %error, "ignoring malformed JOBTRACK_DEV_USER_ID");
            UserId::random()
        }
        None => UserId::random(),
    };
    UserIdentity {
        id,
        name: name.unwrap_or_else(|| "Dev User".to_owned()),
        email: email.unwrap_or_else(|| "dev@example.com".to_owned()),
    }
}
