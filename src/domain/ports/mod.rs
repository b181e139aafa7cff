//! Domain ports for the hexagonal boundary.
//!
//! Inbound adapters drive the domain through [`crate::domain::JobService`];
//! the traits here are the driven side: persistence, credential
//! verification, and notification delivery. Adapters live under
//! `crate::outbound`.

mod job_repository;
mod notifier;
mod token_verifier;

pub use job_repository::{JobRepository, JobRepositoryError};
pub use notifier::{Notifier, PublishError};
pub use token_verifier::{TokenVerifier, TokenVerifierError};
