//! # nebula-api — Axum API Service
//!
//! HTTP surface over the bounty store and the command interpreter.
//!
//! ## Routes
//!
//! - `/v1/commands` — natural-language commands, and the recent-command log
//! - `/v1/bounties/*` — listing, lookup, creation, lifecycle transitions, chat
//! - `/v1/actors/{id}/bounties` — bounties by actor and role
//! - `/health/*` — liveness and readiness probes (unauthenticated)
//! - `/metrics` — Prometheus exposition (unauthenticated)
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → metrics → auth
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers: lifecycle rules live in
//!   `nebula-state`, command semantics in `nebula-agentic`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the auth middleware so
/// they remain reachable without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        secret: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::commands::router())
        .merge(routes::bounties::router())
        .merge(routes::chat::router())
        .merge(routes::actors::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::render_metrics))
        .with_state(state);

    Router::new().merge(ops).merge(api)
}

/// Liveness probe. Always 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe.
async fn readiness() -> &'static str {
    "ready"
}
