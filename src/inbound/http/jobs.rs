//! REST handlers for the job-application collection.
//!
//! All routes require a bearer token and operate strictly on the caller's
//! own records. Lookups that miss, and lookups that hit another user's
//! record, both answer 404 so record ids leak nothing about other accounts.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{ApiResult, identity::Identity, state::HttpState};
use crate::domain::{
    Error, JobDraft, JobDraftParts, JobQuery, JobSort, JobStatus, JobValidationError,
};

/// Incoming create/update payload. Everything arrives as optional text and
/// is validated into a [`JobDraft`] so the response can name the offending
/// field.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub applied_date: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

impl JobRequest {
    fn into_draft(self) -> Result<JobDraft, JobValidationError> {
        JobDraft::try_from_parts(JobDraftParts {
            company: self.company,
            position: self.position,
            status: self.status,
            applied_date: self.applied_date,
            location: self.location,
            salary: self.salary,
            job_url: self.job_url,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    /// Restrict results to a single status.
    pub status: Option<String>,
    /// Field name, with a `-` prefix for descending order.
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<JobQuery, JobValidationError> {
        let status = match self.status.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) => Some(JobStatus::parse(raw).ok_or_else(|| {
                JobValidationError::InvalidStatus {
                    value: raw.to_owned(),
                }
            })?),
        };
        let sort = match self.sort_by.as_deref().map(str::trim) {
            Some("") | None => JobSort::default(),
            Some(raw) => JobSort::parse(raw)?,
        };
        let page = parse_positive(self.page, JobValidationError::InvalidPage)?;
        let limit = parse_positive(self.limit, JobValidationError::InvalidLimit)?;
        JobQuery::new(status, sort, page, limit)
    }
}

fn parse_positive(
    raw: Option<String>,
    error: JobValidationError,
) -> Result<Option<u32>, JobValidationError> {
    match raw.as_deref().map(str::trim) {
        Some("") | None => Ok(None),
        Some(text) => text.parse::<u32>().map(Some).map_err(|_| error),
    }
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    // Unparseable ids behave exactly like ids that do not exist.
    Uuid::parse_str(raw).map_err(|_| Error::not_found("Job not found"))
}

/// List the caller's applications, newest first by default.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(ListParams),
    responses(
        (status = 200, description = "Page of job applications"),
        (status = 400, description = "Invalid filter or pagination input"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    identity: Identity,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().into_query().map_err(Error::from)?;
    let jobs = state.jobs.list(&identity.0.id, &query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// Per-status counts over the caller's whole collection.
#[utoipa::path(
    get,
    path = "/api/jobs/stats",
    responses(
        (status = 200, description = "Counts per status plus a total"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[get("/jobs/stats")]
pub async fn job_stats(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    let stats = state.jobs.stats(&identity.0.id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Fetch one application owned by the caller.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job application id")),
    responses(
        (status = 200, description = "The job application"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No such record for this caller")
    ),
    security(("bearer" = []))
)]
#[get("/jobs/{id}")]
pub async fn get_job(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    let job = state.jobs.get(&identity.0.id, id).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// Create an application for the caller.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = JobRequest,
    responses(
        (status = 201, description = "Created job application"),
        (status = 400, description = "Validation failure naming the field"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    identity: Identity,
    body: web::Json<JobRequest>,
) -> ApiResult<HttpResponse> {
    let draft = body.into_inner().into_draft().map_err(Error::from)?;
    let job = state.jobs.create(identity.0.id, draft).await?;
    Ok(HttpResponse::Created().json(job))
}

/// Replace an application's fields, recording any status transition.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job application id")),
    request_body = JobRequest,
    responses(
        (status = 200, description = "Updated job application"),
        (status = 400, description = "Validation failure naming the field"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No such record for this caller")
    ),
    security(("bearer" = []))
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<JobRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    let draft = body.into_inner().into_draft().map_err(Error::from)?;
    let job = state.jobs.update(&identity.0.id, id, draft).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// Delete an application owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job application id")),
    responses(
        (status = 200, description = "Record removed"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No such record for this caller")
    ),
    security(("bearer" = []))
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    state.jobs.delete(&identity.0.id, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Job deleted successfully" })))
}

/// Map JSON payload failures into the standard error envelope; without
/// this, actix answers extraction errors with a plain-text body.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _req| {
        Error::invalid_request(format!("Invalid JSON payload: {error}")).into()
    })
}

/// Mount the job routes under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(
        web::scope("/api")
            // Register before the `{id}` routes so "stats" never parses as an id.
            .service(job_stats)
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_http::Request;
    use actix_web::{
        App,
        dev::{Service, ServiceResponse},
        http::{StatusCode, header},
        test,
    };
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{JobService, UserId, UserIdentity};
    use crate::outbound::{
        auth::StaticTokenVerifier,
        notify::{ConnectionRegistry, FanoutNotifier},
        persistence::InMemoryJobRepository,
    };

    const ALICE_TOKEN: &str = "alice-token";
    const BOB_TOKEN: &str = "bob-token";

    fn identity(name: &str) -> UserIdentity {
        UserIdentity {
            id: UserId::random(),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    async fn test_app()
    -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        let verifier = Arc::new(
            StaticTokenVerifier::new()
                .with_token(ALICE_TOKEN, identity("Alice"))
                .with_token(BOB_TOKEN, identity("Bob")),
        );
        let registry = Arc::new(ConnectionRegistry::new());
        let notifier = Arc::new(FanoutNotifier::new(registry));
        let repository = Arc::new(InMemoryJobRepository::new());
        let state = HttpState::new(Arc::new(JobService::new(repository, notifier)), verifier);
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await
    }

    fn payload(company: &str, position: &str) -> Value {
        json!({
            "company": company,
            "position": position,
            "appliedDate": "2024-03-01",
        })
    }

    async fn post_job(
        app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
        token: &str,
        body: Value,
    ) -> ServiceResponse {
        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(body)
            .to_request();
        test::call_service(app, req).await
    }

    async fn get_json(
        app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
        token: &str,
        uri: &str,
    ) -> (StatusCode, Value) {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(app, req).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn create_defaults_status_and_returns_created() {
        let app = test_app().await;
        let res = post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("status").and_then(Value::as_str), Some("applied"));
        assert_eq!(body.get("company").and_then(Value::as_str), Some("Acme"));
        assert!(body.get("id").and_then(Value::as_str).is_some());
        assert_eq!(
            body.get("statusHistory").and_then(Value::as_array).map(Vec::len),
            Some(0)
        );
    }

    #[actix_web::test]
    async fn requests_without_a_token_are_rejected() {
        let app = test_app().await;
        let req = test::TestRequest::get().uri("/api/jobs").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[actix_web::test]
    async fn malformed_json_bodies_get_the_error_envelope() {
        let app = test_app().await;
        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .insert_header((header::AUTHORIZATION, format!("Bearer {ALICE_TOKEN}")))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not valid json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
        assert!(
            body.get("message")
                .and_then(Value::as_str)
                .is_some_and(|message| message.starts_with("Invalid JSON payload")),
            "unexpected body: {body}"
        );
    }

    #[rstest]
    #[case(json!({ "position": "Engineer", "appliedDate": "2024-03-01" }), "company", "missing_field")]
    #[case(json!({ "company": "Acme", "position": "Engineer", "appliedDate": "not-a-date" }), "appliedDate", "invalid_date")]
    #[case(json!({ "company": "Acme", "position": "Engineer", "appliedDate": "2024-03-01", "status": "ghosted" }), "status", "invalid_status")]
    #[case(json!({ "company": "Acme", "position": "Engineer", "appliedDate": "2024-03-01", "jobUrl": "not-a-url" }), "jobUrl", "invalid_url")]
    #[actix_web::test]
    async fn validation_failures_name_the_field(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = test_app().await;
        let res = post_job(&app, ALICE_TOKEN, body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        let details = body.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[actix_web::test]
    async fn listing_is_scoped_to_the_caller() {
        let app = test_app().await;
        post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await;
        post_job(&app, ALICE_TOKEN, payload("Globex", "Analyst")).await;
        post_job(&app, BOB_TOKEN, payload("Initech", "Manager")).await;

        let (status, body) = get_json(&app, ALICE_TOKEN, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body.as_array().expect("array body");
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| {
            let company = job.get("company").and_then(Value::as_str).unwrap_or("");
            company == "Acme" || company == "Globex"
        }));
    }

    #[actix_web::test]
    async fn list_supports_sort_filter_and_pagination() {
        let app = test_app().await;
        for company in ["Acme", "Globex", "Initech"] {
            post_job(&app, ALICE_TOKEN, payload(company, "Engineer")).await;
        }

        let (status, body) =
            get_json(&app, ALICE_TOKEN, "/api/jobs?sortBy=company&page=2&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        let companies: Vec<&str> = body
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|job| job.get("company").and_then(Value::as_str))
            .collect();
        assert_eq!(companies, vec!["Initech"]);

        let (status, body) =
            get_json(&app, ALICE_TOKEN, "/api/jobs?status=interview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(0));
    }

    #[rstest]
    #[case("/api/jobs?sortBy=favouriteColour")]
    #[case("/api/jobs?page=0")]
    #[case("/api/jobs?limit=zero")]
    #[case("/api/jobs?status=ghosted")]
    #[actix_web::test]
    async fn bad_list_parameters_are_rejected(#[case] uri: &str) {
        let app = test_app().await;
        let (status, body) = get_json(&app, ALICE_TOKEN, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
    }

    #[actix_web::test]
    async fn update_changes_fields_and_appends_history() {
        let app = test_app().await;
        let created: Value =
            test::read_body_json(post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await)
                .await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let mut body = payload("Acme", "Engineer");
        body["status"] = json!("interview");
        let req = test::TestRequest::put()
            .uri(&format!("/api/jobs/{id}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {ALICE_TOKEN}")))
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;
        assert_eq!(
            updated.get("status").and_then(Value::as_str),
            Some("interview")
        );
        let history = updated
            .get("statusHistory")
            .and_then(Value::as_array)
            .expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].get("status").and_then(Value::as_str),
            Some("interview")
        );
    }

    #[actix_web::test]
    async fn records_of_other_users_look_absent() {
        let app = test_app().await;
        let created: Value =
            test::read_body_json(post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await)
                .await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let (status, body) = get_json(&app, BOB_TOKEN, &format!("/api/jobs/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Job not found")
        );
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("123")]
    #[actix_web::test]
    async fn malformed_ids_answer_not_found(#[case] id: &str) {
        let app = test_app().await;
        let (status, _) = get_json(&app, ALICE_TOKEN, &format!("/api/jobs/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_removes_the_record() {
        let app = test_app().await;
        let created: Value =
            test::read_body_json(post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await)
                .await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/jobs/{id}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {ALICE_TOKEN}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Job deleted successfully")
        );

        let (status, _) = get_json(&app, ALICE_TOKEN, &format!("/api/jobs/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn stats_count_per_status_for_the_caller_only() {
        let app = test_app().await;
        post_job(&app, ALICE_TOKEN, payload("Acme", "Engineer")).await;
        let mut offer = payload("Globex", "Analyst");
        offer["status"] = json!("offer");
        post_job(&app, ALICE_TOKEN, offer).await;
        post_job(&app, BOB_TOKEN, payload("Initech", "Manager")).await;

        let (status, body) = get_json(&app, ALICE_TOKEN, "/api/jobs/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("total").and_then(Value::as_u64), Some(2));
        assert_eq!(body.get("applied").and_then(Value::as_u64), Some(1));
        assert_eq!(body.get("offer").and_then(Value::as_u64), Some(1));
        assert_eq!(body.get("interview").and_then(Value::as_u64), Some(0));
    }
}
