//! Job application aggregate and its validation rules.
//!
//! ## Invariants
//! - `id` and `owner` are assigned at creation and never change.
//! - `status_history` is append-only; an entry is added exactly when the
//!   status value changes on an existing record, carrying the post-change
//!   status and the update instant. Creation appends nothing.
//! - Field bounds (company/position ≤ 100, salary ≤ 50, notes ≤ 1000,
//!   absolute http(s) `jobUrl`) are enforced by [`JobDraft::try_from_parts`]
//!   before a record is built or mutated.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum length for company and position names.
pub const NAME_MAX: usize = 100;
/// Maximum length for the free-form salary field.
pub const SALARY_MAX: usize = 50;
/// Maximum length for the location field.
pub const LOCATION_MAX: usize = 100;
/// Maximum length for notes.
pub const NOTES_MAX: usize = 1000;

/// Lifecycle status of a job application.
///
/// Any status may follow any other; the model imposes no workflow order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

impl JobStatus {
    /// All statuses in declaration order.
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Accepted,
    ];

    /// Wire-format name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Applied => "applied",
            JobStatus::Interview => "interview",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Accepted => "accepted",
        }
    }

    /// Parse a wire-format status name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// The post-change status value.
    pub status: JobStatus,
    /// When the transition was applied.
    pub date: DateTime<Utc>,
    /// Optional caller-supplied annotation; never set by automatic entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A tracked job application owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    /// Opaque unique identifier, assigned at creation.
    pub id: Uuid,
    /// Owning user; records are visible and mutable only to their owner.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub owner: UserId,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Append-only record of status transitions since creation.
    pub status_history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Build a new record from a validated draft.
    ///
    /// The status defaults to [`JobStatus::Applied`] when the draft omits it
    /// and the history starts empty; creation itself is not a transition.
    pub fn create(owner: UserId, draft: JobDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            company: draft.company,
            position: draft.position,
            status: draft.status.unwrap_or(JobStatus::Applied),
            applied_date: draft.applied_date,
            location: draft.location,
            salary: draft.salary,
            job_url: draft.job_url,
            notes: draft.notes,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a full-field update from a validated draft.
    ///
    /// When the draft carries a status different from the stored one, a
    /// [`StatusChange`] with the post-change value and the update instant is
    /// appended. A draft without a status leaves the stored status (and the
    /// history) untouched. History bookkeeping lives here, in the update
    /// itself, rather than in a persistence hook.
    pub fn apply(&mut self, draft: JobDraft, now: DateTime<Utc>) {
        if let Some(next) = draft.status {
            if next != self.status {
                self.status_history.push(StatusChange {
                    status: next,
                    date: now,
                    notes: None,
                });
                self.status = next;
            }
        }
        self.company = draft.company;
        self.position = draft.position;
        self.applied_date = draft.applied_date;
        self.location = draft.location;
        self.salary = draft.salary;
        self.job_url = draft.job_url;
        self.notes = draft.notes;
        self.updated_at = now;
    }
}

/// Validation failures raised while building a [`JobDraft`] or [`JobQuery`].
///
/// Each variant maps to exactly one offending field; validation stops at the
/// first failure so clients see one problem at a time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    #[error("Company name is required")]
    MissingCompany,
    #[error("Company name cannot be more than {NAME_MAX} characters")]
    CompanyTooLong,
    #[error("Position is required")]
    MissingPosition,
    #[error("Position cannot be more than {NAME_MAX} characters")]
    PositionTooLong,
    #[error("Status must be one of applied, interview, offer, rejected, accepted")]
    InvalidStatus { value: String },
    #[error("Applied date is required")]
    MissingAppliedDate,
    #[error("Applied date must be a valid calendar date")]
    InvalidAppliedDate { value: String },
    #[error("Location cannot be more than {LOCATION_MAX} characters")]
    LocationTooLong,
    #[error("Salary cannot be more than {SALARY_MAX} characters")]
    SalaryTooLong,
    #[error("Job URL must be a valid URL")]
    InvalidJobUrl { value: String },
    #[error("Notes cannot be more than {NOTES_MAX} characters")]
    NotesTooLong,
    #[error("Unknown sort field")]
    UnknownSortField { value: String },
    #[error("Page must be a positive integer")]
    InvalidPage,
    #[error("Limit must be a positive integer")]
    InvalidLimit,
}

impl JobValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingCompany | Self::CompanyTooLong => "company",
            Self::MissingPosition | Self::PositionTooLong => "position",
            Self::InvalidStatus { .. } => "status",
            Self::MissingAppliedDate | Self::InvalidAppliedDate { .. } => "appliedDate",
            Self::LocationTooLong => "location",
            Self::SalaryTooLong => "salary",
            Self::InvalidJobUrl { .. } => "jobUrl",
            Self::NotesTooLong => "notes",
            Self::UnknownSortField { .. } => "sortBy",
            Self::InvalidPage => "page",
            Self::InvalidLimit => "limit",
        }
    }

    /// Stable machine-readable failure code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCompany | Self::MissingPosition | Self::MissingAppliedDate => {
                "missing_field"
            }
            Self::CompanyTooLong
            | Self::PositionTooLong
            | Self::LocationTooLong
            | Self::SalaryTooLong
            | Self::NotesTooLong => "too_long",
            Self::InvalidStatus { .. } => "invalid_status",
            Self::InvalidAppliedDate { .. } => "invalid_date",
            Self::InvalidJobUrl { .. } => "invalid_url",
            Self::UnknownSortField { .. } => "unknown_sort_field",
            Self::InvalidPage | Self::InvalidLimit => "out_of_range",
        }
    }
}

impl From<JobValidationError> for crate::domain::Error {
    fn from(value: JobValidationError) -> Self {
        crate::domain::Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Raw, untrusted field values as supplied by a caller.
#[derive(Debug, Clone, Default)]
pub struct JobDraftParts {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub applied_date: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

/// Validated field set ready to create or update a [`JobApplication`].
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub company: String,
    pub position: String,
    /// `None` keeps the stored status on update and defaults to
    /// [`JobStatus::Applied`] on create.
    pub status: Option<JobStatus>,
    pub applied_date: NaiveDate,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

impl JobDraft {
    /// Validate raw parts into a draft, stopping at the first offending
    /// field. Fields are checked in a fixed order so a payload with several
    /// problems always names the same one: company, position, status,
    /// appliedDate, location, salary, jobUrl, notes.
    pub fn try_from_parts(parts: JobDraftParts) -> Result<Self, JobValidationError> {
        let company = required_name(parts.company, JobValidationError::MissingCompany, || {
            JobValidationError::CompanyTooLong
        })?;
        let position = required_name(parts.position, JobValidationError::MissingPosition, || {
            JobValidationError::PositionTooLong
        })?;

        let status = match nonempty(parts.status) {
            Some(raw) => Some(
                JobStatus::parse(&raw).ok_or(JobValidationError::InvalidStatus { value: raw })?,
            ),
            None => None,
        };

        let applied_date = {
            let raw = nonempty(parts.applied_date).ok_or(JobValidationError::MissingAppliedDate)?;
            parse_applied_date(&raw).ok_or(JobValidationError::InvalidAppliedDate { value: raw })?
        };

        let location = bounded(parts.location, LOCATION_MAX, JobValidationError::LocationTooLong)?;
        let salary = bounded(parts.salary, SALARY_MAX, JobValidationError::SalaryTooLong)?;

        let job_url = match nonempty(parts.job_url) {
            Some(raw) => {
                validate_job_url(&raw)
                    .then_some(())
                    .ok_or(JobValidationError::InvalidJobUrl { value: raw.clone() })?;
                Some(raw)
            }
            None => None,
        };

        let notes = bounded(parts.notes, NOTES_MAX, JobValidationError::NotesTooLong)?;

        Ok(Self {
            company,
            position,
            status,
            applied_date,
            location,
            salary,
            job_url,
            notes,
        })
    }
}

fn nonempty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required_name(
    value: Option<String>,
    missing: JobValidationError,
    too_long: impl FnOnce() -> JobValidationError,
) -> Result<String, JobValidationError> {
    let value = nonempty(value).ok_or(missing)?;
    if value.chars().count() > NAME_MAX {
        return Err(too_long());
    }
    Ok(value)
}

fn bounded(
    value: Option<String>,
    max: usize,
    too_long: JobValidationError,
) -> Result<Option<String>, JobValidationError> {
    match nonempty(value) {
        Some(v) if v.chars().count() > max => Err(too_long),
        other => Ok(other),
    }
}

fn parse_applied_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn validate_job_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Sortable record fields accepted by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    AppliedDate,
    Company,
    Position,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "appliedDate" => Some(Self::AppliedDate),
            "company" => Some(Self::Company),
            "position" => Some(Self::Position),
            "status" => Some(Self::Status),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Sort order for listing; a `-` prefix on the wire means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSort {
    pub field: SortField,
    pub descending: bool,
}

impl JobSort {
    /// Parse a `sortBy` value such as `company` or `-appliedDate`.
    pub fn parse(raw: &str) -> Result<Self, JobValidationError> {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = SortField::parse(name).ok_or(JobValidationError::UnknownSortField {
            value: raw.to_owned(),
        })?;
        Ok(Self { field, descending })
    }
}

impl Default for JobSort {
    /// Most recent applications first.
    fn default() -> Self {
        Self {
            field: SortField::AppliedDate,
            descending: true,
        }
    }
}

/// Validated list parameters: optional status filter, sort order, and
/// 1-based pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub status: Option<JobStatus>,
    pub sort: JobSort,
    pub page: u32,
    pub limit: u32,
}

impl JobQuery {
    pub const DEFAULT_LIMIT: u32 = 50;

    /// Validate pagination inputs; both must be positive when supplied.
    pub fn new(
        status: Option<JobStatus>,
        sort: JobSort,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Self, JobValidationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(JobValidationError::InvalidPage);
        }
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit == 0 {
            return Err(JobValidationError::InvalidLimit);
        }
        Ok(Self {
            status,
            sort,
            page,
            limit,
        })
    }
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            status: None,
            sort: JobSort::default(),
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Per-status record counts for one owner. Every status is present even at
/// zero, and the per-status values always sum to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobStats {
    pub total: u64,
    pub applied: u64,
    pub interview: u64,
    pub offer: u64,
    pub rejected: u64,
    pub accepted: u64,
}

impl JobStats {
    /// Count one record with the given status.
    pub fn record(&mut self, status: JobStatus) {
        self.total += 1;
        match status {
            JobStatus::Applied => self.applied += 1,
            JobStatus::Interview => self.interview += 1,
            JobStatus::Offer => self.offer += 1,
            JobStatus::Rejected => self.rejected += 1,
            JobStatus::Accepted => self.accepted += 1,
        }
    }
}
