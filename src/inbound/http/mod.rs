//! HTTP inbound adapter.
//!
//! Handlers translate between the REST wire format and the domain: request
//! DTOs are validated into domain drafts, domain errors map onto HTTP
//! status codes via `ResponseError`, and every `/jobs` route requires an
//! identity resolved through the credential port.

mod error;
pub mod health;
pub mod identity;
pub mod jobs;
pub mod state;

pub use error::ApiResult;
