//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API. It registers:
//!
//! - **Paths**: all HTTP endpoints from the inbound layer (jobs, health)
//! - **Schemas**: the domain types carried on the wire
//! - **Security**: the bearer token authentication scheme
//!
//! Debug builds serve the generated document at `/api-docs/openapi.json`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, JobApplication, JobStats, JobStatus, StatusChange};
use crate::inbound::http::health::{BannerResponse, HealthResponse};
use crate::inbound::http::jobs::JobRequest;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Job tracker API",
        description = "HTTP interface for per-user job application tracking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::job_stats,
        crate::inbound::http::jobs::get_job,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::update_job,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::health::health,
        crate::inbound::http::health::banner,
    ),
    components(schemas(
        JobApplication,
        JobRequest,
        JobStats,
        JobStatus,
        StatusChange,
        Error,
        ErrorCode,
        HealthResponse,
        BannerResponse,
    )),
    tags(
        (name = "jobs", description = "Operations on job applications"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
