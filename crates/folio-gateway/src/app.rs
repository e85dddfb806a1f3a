//! Router assembly: shared state, CORS, request observation, route table.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use folio_core::{AdminAuth, AnalyticsEvent, ChatResponder, PortfolioStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{admin, routes};

/// Paths that never count as page views.
const UNTRACKED_PREFIXES: &[&str] = &["/api/auth", "/api/analytics", "/api/health"];

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PortfolioStore>,
    pub responder: ChatResponder,
    pub admin: Arc<AdminAuth>,
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/login", post(admin::login))
        .route("/api/auth/verify", get(admin::verify))
        .route("/api/profile", get(routes::get_profile).put(routes::put_profile))
        .route("/api/skills", get(routes::list_skills).post(routes::create_skill))
        .route("/api/skills/:id", put(routes::update_skill).delete(routes::delete_skill))
        .route("/api/projects", get(routes::list_projects).post(routes::create_project))
        .route(
            "/api/projects/:id",
            get(routes::get_project)
                .put(routes::update_project)
                .delete(routes::delete_project),
        )
        .route("/api/experience", get(routes::list_experience).post(routes::create_experience))
        .route(
            "/api/experience/:id",
            put(routes::update_experience).delete(routes::delete_experience),
        )
        .route("/api/analytics/overview", get(routes::analytics_overview))
        .route("/api/analytics/projects", get(routes::analytics_projects))
        .route("/api/analytics/timeline", get(routes::analytics_timeline))
        .route("/api/chat", post(routes::chat))
        .layer(middleware::from_fn_with_state(state.clone(), observe_request))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    tracing::info!(origins = ?origins, "CORS origins allowed");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .allow_credentials(true)
}

/// Logs each request and records a page view for public routes. Tracking never fails a request.
async fn observe_request(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let ip = client_ip(request.headers(), connect);
    tracing::debug!(method = %request.method(), path = %path, client = ?ip, "request");

    let tracked = request.method() != Method::OPTIONS
        && !UNTRACKED_PREFIXES.iter().any(|p| path.starts_with(p));
    if tracked {
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Err(e) = state
            .store
            .record_event(&AnalyticsEvent::page_view(ip, user_agent))
        {
            tracing::warn!(error = %e, "page view tracking failed");
        }
    }

    next.run(request).await
}

/// First `X-Forwarded-For` entry, else the socket peer.
pub(crate) fn client_ip(headers: &HeaderMap, connect: Option<ConnectInfo<SocketAddr>>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| connect.map(|ConnectInfo(addr)| addr.ip().to_string()))
}
