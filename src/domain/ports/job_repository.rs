//! Port abstraction for job persistence adapters and their errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{JobApplication, JobQuery, JobStats, UserId};

/// Persistence errors raised by job repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobRepositoryError {
    /// Query or mutation failed during execution.
    #[error("job repository failure: {message}")]
    Storage { message: String },
}

impl JobRepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Owner-scoped persistence for job applications.
///
/// Every operation takes the owner explicitly; an id that exists but
/// belongs to a different owner behaves exactly like an absent id, so
/// adapters cannot leak record existence across owners.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a freshly created record.
    async fn insert(&self, job: JobApplication) -> Result<(), JobRepositoryError>;

    /// Fetch a record by id; `None` when absent or owned by someone else.
    async fn find(&self, owner: &UserId, id: Uuid)
    -> Result<Option<JobApplication>, JobRepositoryError>;

    /// List the owner's records matching the query, sorted and paginated.
    /// Ordering is stable: equal sort keys tie-break by id.
    async fn list(
        &self,
        owner: &UserId,
        query: &JobQuery,
    ) -> Result<Vec<JobApplication>, JobRepositoryError>;

    /// Replace a stored record. The record's id and owner select the slot;
    /// returns whether anything was replaced.
    async fn update(&self, job: JobApplication) -> Result<bool, JobRepositoryError>;

    /// Remove a record; returns whether anything was removed.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, JobRepositoryError>;

    /// Per-status counts plus total across the owner's records.
    async fn stats(&self, owner: &UserId) -> Result<JobStats, JobRepositoryError>;
}
