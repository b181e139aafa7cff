//! Process-local job storage.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{JobRepository, JobRepositoryError};
use crate::domain::{JobApplication, JobQuery, JobStats, SortField, UserId};

/// Volatile repository keeping all records in memory.
///
/// Lost on restart by design; useful for development, tests, and as the
/// reference implementation of the repository contract.
#[derive(Default)]
pub struct InMemoryJobRepository {
    records: RwLock<HashMap<Uuid, JobApplication>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, JobApplication>>, JobRepositoryError>
    {
        self.records
            .read()
            .map_err(|_| JobRepositoryError::storage("job store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, JobApplication>>, JobRepositoryError>
    {
        self.records
            .write()
            .map_err(|_| JobRepositoryError::storage("job store lock poisoned"))
    }
}

fn compare(a: &JobApplication, b: &JobApplication, field: SortField) -> Ordering {
    match field {
        SortField::AppliedDate => a.applied_date.cmp(&b.applied_date),
        SortField::Company => a.company.cmp(&b.company),
        SortField::Position => a.position.cmp(&b.position),
        SortField::Status => a.status.cmp(&b.status),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: JobApplication) -> Result<(), JobRepositoryError> {
        self.write()?.insert(job.id, job);
        Ok(())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<JobApplication>, JobRepositoryError> {
        Ok(self
            .read()?
            .get(&id)
            .filter(|job| job.owner == *owner)
            .cloned())
    }

    async fn list(
        &self,
        owner: &UserId,
        query: &JobQuery,
    ) -> Result<Vec<JobApplication>, JobRepositoryError> {
        let mut matches: Vec<JobApplication> = self
            .read()?
            .values()
            .filter(|job| job.owner == *owner)
            .filter(|job| query.status.is_none_or(|status| job.status == status))
            .cloned()
            .collect();

        let sort = query.sort;
        matches.sort_by(|a, b| {
            let mut ordering = compare(a, b, sort.field);
            if sort.descending {
                ordering = ordering.reverse();
            }
            // Stable ordering for equal keys regardless of direction.
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let skip = (query.page as usize - 1).saturating_mul(query.limit as usize);
        Ok(matches
            .into_iter()
            .skip(skip)
            .take(query.limit as usize)
            .collect())
    }

    async fn update(&self, job: JobApplication) -> Result<bool, JobRepositoryError> {
        let mut records = self.write()?;
        match records.get(&job.id) {
            Some(existing) if existing.owner == job.owner => {
                records.insert(job.id, job);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, JobRepositoryError> {
        let mut records = self.write()?;
        match records.get(&id) {
            Some(existing) if existing.owner == *owner => {
                records.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn stats(&self, owner: &UserId) -> Result<JobStats, JobRepositoryError> {
        let mut stats = JobStats::default();
        for job in self.read()?.values().filter(|job| job.owner == *owner) {
            stats.record(job.status);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobDraft, JobDraftParts, JobSort, JobStatus};
    use chrono::Utc;
    use rstest::rstest;

    fn draft(company: &str, applied: &str, status: Option<&str>) -> JobDraft {
        JobDraft::try_from_parts(JobDraftParts {
            company: Some(company.into()),
            position: Some("Engineer".into()),
            applied_date: Some(applied.into()),
            status: status.map(Into::into),
            ..JobDraftParts::default()
        })
        .expect("valid draft")
    }

    async fn seeded(owner: UserId) -> InMemoryJobRepository {
        let repo = InMemoryJobRepository::new();
        for (company, applied, status) in [
            ("Acme", "2025-01-03", None),
            ("Globex", "2025-01-01", Some("offer")),
            ("Initech", "2025-01-02", Some("interview")),
        ] {
            let job = JobApplication::create(owner, draft(company, applied, status), Utc::now());
            repo.insert(job).await.expect("insert");
        }
        repo
    }

    #[tokio::test]
    async fn find_is_owner_scoped() {
        let owner = UserId::random();
        let repo = InMemoryJobRepository::new();
        let job = JobApplication::create(owner, draft("Acme", "2025-01-01", None), Utc::now());
        let id = job.id;
        repo.insert(job).await.expect("insert");

        assert!(repo.find(&owner, id).await.expect("find").is_some());
        assert!(
            repo.find(&UserId::random(), id)
                .await
                .expect("find")
                .is_none()
        );
    }

    #[rstest]
    #[case("-appliedDate", vec!["Acme", "Initech", "Globex"])]
    #[case("appliedDate", vec!["Globex", "Initech", "Acme"])]
    #[case("company", vec!["Acme", "Globex", "Initech"])]
    #[tokio::test]
    async fn list_sorts_by_requested_field(
        #[case] sort_by: &str,
        #[case] expected: Vec<&str>,
    ) {
        let owner = UserId::random();
        let repo = seeded(owner).await;
        let query = JobQuery {
            sort: JobSort::parse(sort_by).expect("valid sort"),
            ..JobQuery::default()
        };
        let companies: Vec<String> = repo
            .list(&owner, &query)
            .await
            .expect("list")
            .into_iter()
            .map(|job| job.company)
            .collect();
        assert_eq!(companies, expected);
    }

    #[tokio::test]
    async fn list_filters_by_status_and_paginates() {
        let owner = UserId::random();
        let repo = seeded(owner).await;

        let offers = repo
            .list(
                &owner,
                &JobQuery {
                    status: Some(JobStatus::Offer),
                    ..JobQuery::default()
                },
            )
            .await
            .expect("list");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].company, "Globex");

        let page_two = repo
            .list(
                &owner,
                &JobQuery {
                    page: 2,
                    limit: 2,
                    ..JobQuery::default()
                },
            )
            .await
            .expect("list");
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].company, "Globex");
    }

    #[tokio::test]
    async fn equal_sort_keys_tie_break_by_id() {
        let owner = UserId::random();
        let repo = InMemoryJobRepository::new();
        let now = Utc::now();
        let mut ids = Vec::new();
        for _ in 0..4 {
            let job = JobApplication::create(owner, draft("Same", "2025-01-01", None), now);
            ids.push(job.id);
            repo.insert(job).await.expect("insert");
        }
        ids.sort();

        for sort_by in ["appliedDate", "-appliedDate"] {
            let query = JobQuery {
                sort: JobSort::parse(sort_by).expect("valid sort"),
                ..JobQuery::default()
            };
            let listed: Vec<Uuid> = repo
                .list(&owner, &query)
                .await
                .expect("list")
                .into_iter()
                .map(|job| job.id)
                .collect();
            assert_eq!(listed, ids, "stable order for {sort_by}");
        }
    }

    #[tokio::test]
    async fn update_and_delete_reject_foreign_owner() {
        let owner = UserId::random();
        let repo = InMemoryJobRepository::new();
        let job = JobApplication::create(owner, draft("Acme", "2025-01-01", None), Utc::now());
        let id = job.id;
        repo.insert(job.clone()).await.expect("insert");

        let mut forged = job;
        forged.owner = UserId::random();
        assert!(!repo.update(forged).await.expect("update"));
        assert!(!repo.delete(&UserId::random(), id).await.expect("delete"));
        assert!(repo.find(&owner, id).await.expect("find").is_some());
    }
}
