//! Domain primitives and services.
//!
//! Purpose: define the strongly typed job-application model, the
//! transport-agnostic error taxonomy, the ports crossed by inbound and
//! outbound adapters, and the `JobService` orchestration. Types here stay
//! free of HTTP and WebSocket concerns; adapters translate at the edges.

pub mod error;
pub mod job;
pub mod jobs;
pub mod notification;
pub mod ports;
pub mod user;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::job::{
    JobApplication, JobDraft, JobDraftParts, JobQuery, JobSort, JobStats, JobStatus,
    JobValidationError, SortField, StatusChange,
};
pub use self::jobs::JobService;
pub use self::notification::{NotificationEvent, NotificationKind};
pub use self::user::{UserId, UserIdentity, UserValidationError};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
