//! Admin login and the `AdminSession` extractor guarding write routes.
//! Accepts `Authorization: Bearer <token>` or `X-API-Key: <token>`.

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use folio_core::ADMIN_USERNAME;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, ApiJson};

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Proof that the request carried the admin token.
pub struct AdminSession;

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match presented_token(&parts.headers) {
            Some(token) if state.admin.verify_token(token) => Ok(AdminSession),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "admin route rejected: missing or invalid token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

fn presented_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.trim())
        })
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    match state.admin.login(&body.email, &body.password) {
        Some(token) => {
            tracing::info!("admin login succeeded");
            Ok(Json(json!({
                "username": ADMIN_USERNAME,
                "email": state.admin.email(),
                "token": token,
            })))
        }
        None => {
            tracing::warn!("admin login failed");
            Err(ApiError::Unauthorized)
        }
    }
}

/// GET /api/auth/verify
pub async fn verify(State(state): State<AppState>, _admin: AdminSession) -> Json<Value> {
    Json(json!({
        "username": ADMIN_USERNAME,
        "email": state.admin.email(),
    }))
}
