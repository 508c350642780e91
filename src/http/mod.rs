//! HTTP surface: the sensor ingest endpoint plus token-gated CRUD routes.

pub mod handlers;

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::Router;
use parking_lot::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::engine::Engine;
use crate::error::ServiceError;

pub struct AppState {
    pub engine: Mutex<Engine>,
    pub sessions: Mutex<HashSet<String>>,
    pub admin_username: String,
    pub admin_password: String,
}

/// Build the Axum router
pub fn build_router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/workers", get(handlers::list_workers))
        .route("/api/workers", post(handlers::add_worker))
        .route("/api/workers/:id", delete(handlers::delete_worker))
        .route("/api/workers/:id/status", post(handlers::change_worker_status))
        .route("/api/bins", get(handlers::list_bins))
        .route("/api/bins", post(handlers::add_bin))
        .route("/api/bins/:id", put(handlers::edit_bin))
        .route("/api/bins/:id", delete(handlers::delete_bin))
        .route("/api/alerts", get(handlers::list_alerts))
        .route("/api/alerts/:id/resolve", post(handlers::resolve_alert))
        .route("/api/assignments", post(handlers::assign_worker))
        .route(
            "/api/assignments/:alert_id/:worker_id",
            delete(handlers::unassign_worker),
        )
        .route("/api/logout", post(handlers::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route("/api/alert", post(handlers::receive_alert))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: &AppConfig, engine: Engine) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        engine: Mutex::new(engine),
        sessions: Mutex::new(HashSet::new()),
        admin_username: config.admin_username.clone(),
        admin_password: config.admin_password.clone(),
    });

    let router = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, router).await?;
    Ok(())
}

pub(crate) fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Session guard applied to the interactive routes. The sensor endpoint and
/// login stay open.
async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = bearer_token(&request).ok_or(ServiceError::Unauthorized)?;
    if !state.sessions.lock().contains(&token) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(next.run(request).await)
}
