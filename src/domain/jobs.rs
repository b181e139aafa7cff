//! Job service: validation, ownership-scoped persistence, and the
//! post-commit notification step.
//!
//! The service owns orchestration only; field validation lives in
//! [`JobDraft`] and the status-history rule in [`JobApplication::apply`].
//! Notification publishing always runs after the primary result is
//! determined and can never change it; failures are logged at the call
//! site and dropped.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{JobRepository, JobRepositoryError, Notifier};
use crate::domain::{
    ApiResult, Error, JobApplication, JobDraft, JobQuery, JobStats, NotificationEvent,
    NotificationKind, UserId,
};

/// Orchestrates job CRUD against the repository and notifier ports.
#[derive(Clone)]
pub struct JobService {
    repository: Arc<dyn JobRepository>,
    notifier: Arc<dyn Notifier>,
}

impl JobService {
    pub fn new(repository: Arc<dyn JobRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Create a record for `owner` from a validated draft.
    ///
    /// Publishes a `success` notification to the owner once the record is
    /// persisted.
    pub async fn create(&self, owner: UserId, draft: JobDraft) -> ApiResult<JobApplication> {
        let job = JobApplication::create(owner, draft, Utc::now());
        self.repository
            .insert(job.clone())
            .await
            .map_err(map_repository_error)?;

        self.notify(
            &job.owner,
            NotificationKind::Success,
            format!(
                "New job application added for {} at {}",
                job.position, job.company
            ),
            job.id,
        )
        .await;
        Ok(job)
    }

    /// Fetch one record. Absent and not-owned are both `NotFound`.
    pub async fn get(&self, owner: &UserId, id: Uuid) -> ApiResult<JobApplication> {
        self.repository
            .find(owner, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)
    }

    /// List the owner's records for the validated query.
    pub async fn list(&self, owner: &UserId, query: &JobQuery) -> ApiResult<Vec<JobApplication>> {
        self.repository
            .list(owner, query)
            .await
            .map_err(map_repository_error)
    }

    /// Apply a full-field update, recording a status transition when the
    /// status value changes, then publish an `info` notification.
    pub async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        draft: JobDraft,
    ) -> ApiResult<JobApplication> {
        let mut job = self.get(owner, id).await?;
        job.apply(draft, Utc::now());
        let replaced = self
            .repository
            .update(job.clone())
            .await
            .map_err(map_repository_error)?;
        if !replaced {
            // Raced with a delete; report as the record no longer existing.
            return Err(not_found());
        }

        self.notify(
            &job.owner,
            NotificationKind::Info,
            format!("Job application updated: {} at {}", job.position, job.company),
            job.id,
        )
        .await;
        Ok(job)
    }

    /// Remove a record and publish a `warning` notification.
    pub async fn delete(&self, owner: &UserId, id: Uuid) -> ApiResult<()> {
        let job = self.get(owner, id).await?;
        let removed = self
            .repository
            .delete(owner, id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(not_found());
        }

        self.notify(
            &job.owner,
            NotificationKind::Warning,
            format!("Job application deleted: {} at {}", job.position, job.company),
            job.id,
        )
        .await;
        Ok(())
    }

    /// Per-status counts plus total for the owner.
    pub async fn stats(&self, owner: &UserId) -> ApiResult<JobStats> {
        self.repository
            .stats(owner)
            .await
            .map_err(map_repository_error)
    }

    /// Post-commit best-effort fan-out; the primary operation's outcome is
    /// already fixed when this runs.
    async fn notify(&self, owner: &UserId, kind: NotificationKind, message: String, job_id: Uuid) {
        let event = NotificationEvent::new(kind, message, Some(job_id));
        match self.notifier.publish(owner, event).await {
            Ok(()) => debug!(user = %owner, job = %job_id, "notification published"),
            Err(error) => {
                warn!(user = %owner, job = %job_id, error = %error, "failed to publish job notification");
            }
        }
    }
}

fn not_found() -> Error {
    Error::not_found("Job not found")
}

fn map_repository_error(error: JobRepositoryError) -> Error {
    Error::internal(format!("job storage error: {error}"))
}
