//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

use jobtrack::Trace;
#[cfg(debug_assertions)]
use jobtrack::doc::ApiDoc;
use jobtrack::domain::JobService;
use jobtrack::inbound::http::state::HttpState;
use jobtrack::inbound::http::{health, jobs};
use jobtrack::inbound::ws;
use jobtrack::inbound::ws::state::WsState;
use jobtrack::outbound::auth::StaticTokenVerifier;
use jobtrack::outbound::notify::{ConnectionRegistry, FanoutNotifier};
use jobtrack::outbound::persistence::InMemoryJobRepository;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

/// Wire the adapters behind the domain ports.
///
/// Notifications fan out through the shared connection registry, so the HTTP
/// and WebSocket states must be built from the same dependency graph.
fn build_dependencies(config: &ServerConfig) -> AppDependencies {
    let registry = Arc::new(ConnectionRegistry::new());
    let notifier = Arc::new(FanoutNotifier::new(registry.clone()));
    let repository = Arc::new(InMemoryJobRepository::new());
    let jobs = Arc::new(JobService::new(repository, notifier));

    let mut verifier = StaticTokenVerifier::new();
    if let Some((token, identity)) = &config.dev_token {
        verifier = verifier.with_token(token.clone(), identity.clone());
    }
    let verifier = Arc::new(verifier);

    AppDependencies {
        http_state: web::Data::new(HttpState::new(jobs, verifier.clone())),
        ws_state: web::Data::new(WsState::new(registry, verifier)),
    }
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        ws_state,
    } = deps;

    let app = App::new()
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        // Health must register ahead of the `/api` scope: a request that
        // enters the scope never falls back to later services.
        .service(health::health)
        .service(health::banner)
        .configure(jobs::configure)
        .service(ws::ws_entry);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );

    app
}

/// Bind and start the HTTP server; the returned [`Server`] completes when
/// the process shuts down.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let deps = build_dependencies(&config);
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
