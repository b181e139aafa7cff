//! Liveness and banner endpoints.

use actix_web::{HttpResponse, get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[get("/api/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}

/// Root banner so a browser hit confirms the service is reachable.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = BannerResponse))
)]
#[get("/")]
pub async fn banner() -> HttpResponse {
    HttpResponse::Ok().json(BannerResponse {
        message: "Job Tracker API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}
