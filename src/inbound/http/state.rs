//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::domain::{JobService, ports::TokenVerifier};

/// State handed to every HTTP handler via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    pub jobs: Arc<JobService>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl HttpState {
    pub fn new(jobs: Arc<JobService>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { jobs, verifier }
    }
}
