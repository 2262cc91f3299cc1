use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::users::UserResponse;
use crate::{
    auth::TokenPair,
    error::AppError,
    middleware::{AuthUser, RefreshUser},
    response::{ApiResult, JsonApiResponse, MessageResponse},
    services::{ServiceContext, session_service::SessionBundle},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let service = ServiceContext::from_state(state.as_ref()).session();
    let bundle = service
        .register(&body.username, &body.email, &body.password)
        .await?;
    JsonApiResponse::created(bundle.into())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let service = ServiceContext::from_state(state.as_ref()).session();
    let bundle = service.login(&body.email_or_username, &body.password).await?;
    JsonApiResponse::ok(bundle.into())
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    RefreshUser(principal): RefreshUser,
) -> ApiResult<TokenResponse> {
    let service = ServiceContext::from_state(state.as_ref()).session();
    let pair = service
        .refresh(&principal.sub, &principal.refresh_token)
        .await?;
    JsonApiResponse::ok(pair.into())
}

async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    body: Bytes,
) -> ApiResult<MessageResponse> {
    let body = parse_logout_body(&body)?;
    let service = ServiceContext::from_state(state.as_ref()).session();
    service
        .logout(&principal.sub, body.refresh_token.as_deref())
        .await?;
    JsonApiResponse::ok(MessageResponse::new("Logged out successfully"))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> ApiResult<UserResponse> {
    let service = ServiceContext::from_state(state.as_ref()).session();
    let user = service.get_profile(&principal.sub).await?;
    JsonApiResponse::ok(user.into())
}

// The logout body is optional; an absent, empty or `null` body means "every session".
fn parse_logout_body(bytes: &[u8]) -> Result<LogoutRequest, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(LogoutRequest::default());
    }
    serde_json::from_slice::<Option<LogoutRequest>>(bytes)
        .map(Option::unwrap_or_default)
        .map_err(|err| AppError::bad_request(format!("Invalid JSON body: {err}")))
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

impl From<SessionBundle> for AuthResponse {
    fn from(bundle: SessionBundle) -> Self {
        Self {
            user: bundle.user.into(),
            access_token: bundle.tokens.access_token,
            refresh_token: bundle.tokens.refresh_token,
        }
    }
}
