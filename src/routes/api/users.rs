use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::user,
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse, MessageResponse},
    services::{ServiceContext, user_service::ProfileChanges},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users/profile", get(profile).patch(update_profile))
        .route("/users/change-password", post(change_password))
        .route("/users/account", delete(delete_account))
        .with_state(state)
}

async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> ApiResult<UserResponse> {
    let service = ServiceContext::from_state(state.as_ref()).user();
    let user = service.profile(&principal.sub).await?;
    JsonApiResponse::ok(user.into())
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<UserResponse> {
    let service = ServiceContext::from_state(state.as_ref()).user();
    let user = service
        .update_profile(
            &principal.sub,
            ProfileChanges {
                username: body.username,
                email: body.email,
            },
        )
        .await?;
    JsonApiResponse::ok(user.into())
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<MessageResponse> {
    let service = ServiceContext::from_state(state.as_ref()).user();
    service
        .change_password(&principal.sub, &body.current_password, &body.new_password)
        .await?;
    JsonApiResponse::ok(MessageResponse::new("Password changed successfully"))
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<DeleteAccountRequest>,
) -> ApiResult<MessageResponse> {
    let service = ServiceContext::from_state(state.as_ref()).user();
    service.delete_account(&principal.sub, &body.password).await?;
    JsonApiResponse::ok(MessageResponse::new("Account deleted successfully"))
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
