//! Route handlers. Reads are public; writes and analytics need an [`AdminSession`].

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use folio_core::{
    AnalyticsEvent, AnalyticsOverview, Experience, ExperienceInput, ExperienceKind,
    ExperienceUpdate, Profile, ProfileInput, Project, ProjectInput, ProjectUpdate, ProjectViewStat,
    Skill, SkillInput, SkillUpdate, TimelinePoint,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

use crate::admin::AdminSession;
use crate::app::{client_ip, AppState};
use crate::error::{ApiError, ApiJson};

type ApiResult<T> = Result<T, ApiError>;

fn removed(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{} removed", entity) }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Json<Profile>> {
    state
        .store
        .get_profile()?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

pub async fn put_profile(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiJson(input): ApiJson<ProfileInput>,
) -> ApiResult<Json<Profile>> {
    let profile = state.store.upsert_profile(input)?;
    tracing::info!(id = %profile.id, "profile saved");
    Ok(Json(profile))
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Json<Vec<Skill>>> {
    Ok(Json(state.store.list_skills()?))
}

pub async fn create_skill(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiJson(input): ApiJson<SkillInput>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    let skill = state.store.create_skill(input)?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<SkillUpdate>,
) -> ApiResult<Json<Skill>> {
    Ok(Json(state.store.update_skill(&id, update)?))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store.delete_skill(&id)?;
    Ok(removed("Skill"))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.store.list_projects()?))
}

/// Public detail view; counts as a project view.
pub async fn get_project(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = state.store.record_project_view(&id)?;
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip = client_ip(&headers, connect);
    if let Err(e) = state
        .store
        .record_event(&AnalyticsEvent::project_view(&project.id, ip, user_agent))
    {
        tracing::warn!(error = %e, project = %project.id, "project view tracking failed");
    }
    Ok(Json(project))
}

pub async fn create_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiJson(input): ApiJson<ProjectInput>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.store.create_project(input)?;
    tracing::info!(id = %project.id, title = %project.title, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProjectUpdate>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.store.update_project(&id, update)?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store.delete_project(&id)?;
    Ok(removed("Project"))
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ExperienceQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub async fn list_experience(
    State(state): State<AppState>,
    Query(query): Query<ExperienceQuery>,
) -> ApiResult<Json<Vec<Experience>>> {
    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ExperienceKind>()?),
    };
    Ok(Json(state.store.list_experiences(kind)?))
}

pub async fn create_experience(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiJson(input): ApiJson<ExperienceInput>,
) -> ApiResult<(StatusCode, Json<Experience>)> {
    let exp = state.store.create_experience(input)?;
    Ok((StatusCode::CREATED, Json(exp)))
}

pub async fn update_experience(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ExperienceUpdate>,
) -> ApiResult<Json<Experience>> {
    Ok(Json(state.store.update_experience(&id, update)?))
}

pub async fn delete_experience(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store.delete_experience(&id)?;
    Ok(removed("Experience"))
}

// ---------------------------------------------------------------------------
// Analytics (admin)
// ---------------------------------------------------------------------------

pub async fn analytics_overview(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> ApiResult<Json<AnalyticsOverview>> {
    Ok(Json(state.store.overview(Utc::now())?))
}

pub async fn analytics_projects(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> ApiResult<Json<Vec<ProjectViewStat>>> {
    let projects = state.store.list_projects()?;
    Ok(Json(state.store.project_stats(&projects)?))
}

pub async fn analytics_timeline(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> ApiResult<Json<Vec<TimelinePoint>>> {
    Ok(Json(state.store.timeline(Utc::now())?))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

/// POST /api/chat: `{ "message": "..." }` in, `{ "response": "..." }` out.
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ChatRequest>,
) -> ApiResult<Json<Value>> {
    let message = body.message.unwrap_or_default();
    let response = state.responder.respond(&message).await?;
    Ok(Json(json!({ "response": response })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_app;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        Router,
    };
    use folio_core::{
        AdminAuth, Candidate, ChatMessage, ChatResponder, CompletionClient, CompletionError,
        EventKind, PortfolioStore,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    struct FakeClient {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<Vec<Candidate>, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(vec![Candidate {
                    text: Some(text.to_string()),
                }]),
                None => Err(CompletionError::Status(503, "upstream down".into())),
            }
        }
    }

    struct Harness {
        app: Router,
        client: Arc<FakeClient>,
        store: Arc<PortfolioStore>,
        _dir: tempfile::TempDir,
    }

    fn harness(reply: Option<&'static str>) -> Harness {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(PortfolioStore::open(Some(dir.path().join("db"))).expect("open store"));
        let client = Arc::new(FakeClient {
            reply,
            calls: AtomicUsize::new(0),
        });
        let state = AppState {
            store: store.clone(),
            responder: ChatResponder::new(store.clone(), client.clone()),
            admin: Arc::new(AdminAuth::new(
                Some("admin@example.com".into()),
                Some("secret".into()),
                TOKEN,
            )),
        };
        Harness {
            app: build_app(state, &["http://localhost:5173".to_string()]),
            client,
            store,
            _dir: dir,
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let h = harness(Some("hi"));
        let (status, body) = send(&h.app, Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "Server is running");
    }

    #[tokio::test]
    async fn chat_returns_provider_reply() {
        let h = harness(Some("Hello from Eve"));
        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/chat",
            Some(json!({ "message": "Who are you?" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Hello from Eve");
        assert_eq!(h.client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn chat_rejects_missing_or_blank_message() {
        let h = harness(Some("unused"));
        for body in [json!({}), json!({ "message": "   " })] {
            let (status, resp) = send(&h.app, Method::POST, "/api/chat", Some(body), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["message"], "Message is required");
        }
        assert_eq!(h.client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_provider_failure_is_generic_500() {
        let h = harness(None);
        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/chat",
            Some(json!({ "message": "hello" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to get AI response. Please try again.");
        assert!(!body.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn writes_require_admin_token() {
        let h = harness(Some("hi"));
        let skill = json!({ "name": "Rust", "category": "Backend" });
        let (status, _) = send(&h.app, Method::POST, "/api/skills", Some(skill.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&h.app, Method::POST, "/api/skills", Some(skill), Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&h.app, Method::GET, "/api/analytics/overview", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_then_verify() {
        let h = harness(Some("hi"));
        let (status, _) = send(
            &h.app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "admin@example.com", "password": "nope" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "Admin@Example.com", "password": "secret" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();
        assert_eq!(token, TOKEN);

        let (status, body) = send(&h.app, Method::GET, "/api/auth/verify", None, Some(token.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "admin@example.com");
    }

    #[tokio::test]
    async fn api_key_header_is_accepted() {
        let h = harness(Some("hi"));
        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/auth/verify")
            .header("X-API-Key", TOKEN)
            .body(Body::empty())
            .unwrap();
        let res = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn profile_missing_then_saved() {
        let h = harness(Some("hi"));
        let (status, body) = send(&h.app, Method::GET, "/api/profile", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Profile not found");

        let profile = json!({ "name": "Althaf", "title": "Developer", "email": "a@example.com" });
        let (status, _) = send(&h.app, Method::PUT, "/api/profile", Some(profile), Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&h.app, Method::GET, "/api/profile", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Althaf");
    }

    #[tokio::test]
    async fn skill_crud_round() {
        let h = harness(Some("hi"));
        let (status, created) = send(
            &h.app,
            Method::POST,
            "/api/skills",
            Some(json!({ "name": "Rust", "category": "Backend", "proficiency": 90 })),
            Some(TOKEN),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["_id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &h.app,
            Method::PUT,
            &format!("/api/skills/{}", id),
            Some(json!({ "proficiency": 95 })),
            Some(TOKEN),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["proficiency"], 95);

        let (status, body) = send(&h.app, Method::DELETE, &format!("/api/skills/{}", id), None, Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Skill removed");

        let (status, _) = send(&h.app, Method::DELETE, &format!("/api/skills/{}", id), None, Some(TOKEN)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_skill_is_bad_request() {
        let h = harness(Some("hi"));
        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/skills",
            Some(json!({ "name": "Rust", "category": "Backend", "proficiency": 150 })),
            Some(TOKEN),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn project_detail_counts_views() {
        let h = harness(Some("hi"));
        let (_, created) = send(
            &h.app,
            Method::POST,
            "/api/projects",
            Some(json!({ "title": "Folio", "description": "Portfolio site", "technologies": ["Rust"] })),
            Some(TOKEN),
        )
        .await;
        let id = created["_id"].as_str().unwrap().to_string();

        send(&h.app, Method::GET, &format!("/api/projects/{}", id), None, None).await;
        let (status, body) = send(&h.app, Method::GET, &format!("/api/projects/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["viewCount"], 2);

        let (status, stats) = send(&h.app, Method::GET, "/api/analytics/projects", None, Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats[0]["projectTitle"], "Folio");
        assert_eq!(stats[0]["viewCount"], 2);

        let (status, _) = send(&h.app, Method::GET, "/api/projects/missing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn experience_filter_by_type() {
        let h = harness(Some("hi"));
        for (kind, title) in [("work", "Developer"), ("education", "BSc")] {
            let (status, _) = send(
                &h.app,
                Method::POST,
                "/api/experience",
                Some(json!({
                    "type": kind,
                    "title": title,
                    "organization": "Somewhere",
                    "startDate": "2020-09-01"
                })),
                Some(TOKEN),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, all) = send(&h.app, Method::GET, "/api/experience", None, None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        let (_, edu) = send(&h.app, Method::GET, "/api/experience?type=education", None, None).await;
        assert_eq!(edu.as_array().unwrap().len(), 1);
        assert_eq!(edu[0]["title"], "BSc");
        let (status, _) = send(&h.app, Method::GET, "/api/experience?type=hobby", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn public_requests_count_as_page_views() {
        let h = harness(Some("hi"));
        send(&h.app, Method::GET, "/api/skills", None, None).await;
        send(&h.app, Method::GET, "/api/projects", None, None).await;
        send(&h.app, Method::GET, "/api/health", None, None).await;

        let (status, overview) = send(&h.app, Method::GET, "/api/analytics/overview", None, Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(overview["totalPageViews"], 2);
        assert_eq!(overview["recentPageViews"], 2);
    }

    #[tokio::test]
    async fn forwarded_client_ip_is_recorded_for_both_view_kinds() {
        let h = harness(Some("hi"));
        let (_, created) = send(
            &h.app,
            Method::POST,
            "/api/projects",
            Some(json!({ "title": "Folio", "description": "Portfolio site" })),
            Some(TOKEN),
        )
        .await;
        let id = created["_id"].as_str().unwrap().to_string();

        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("/api/projects/{}", id))
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        let res = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let events = h.store.events().unwrap();
        assert!(events
            .iter()
            .any(|e| e.kind == EventKind::PageView && e.ip_address.as_deref() == Some("203.0.113.7")));
        let view = events
            .iter()
            .find(|e| e.kind == EventKind::ProjectView)
            .unwrap();
        assert_eq!(view.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(view.project_id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn cors_allows_only_configured_origins() {
        let h = harness(Some("hi"));
        let request = |origin: &str| {
            Request::builder()
                .method(Method::GET)
                .uri("/api/health")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };

        let res = h.app.clone().oneshot(request("http://localhost:5173")).await.unwrap();
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let res = h.app.clone().oneshot(request("https://evil.example")).await.unwrap();
        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn preflight_is_not_a_page_view() {
        let h = harness(Some("hi"));
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let res = h.app.clone().oneshot(req).await.unwrap();
        assert!(res.status().is_success());
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let (_, overview) = send(&h.app, Method::GET, "/api/analytics/overview", None, Some(TOKEN)).await;
        assert_eq!(overview["totalPageViews"], 0);
    }
}
