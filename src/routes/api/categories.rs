use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::category_dao::CategoryChanges,
    db::entities::category,
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse, MessageResponse},
    services::{ServiceContext, category_service::{CategoryService, NewCategory}},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .with_state(state)
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let category = category_service(&state)
        .create(
            &principal.sub,
            NewCategory {
                name: body.name,
                icon: body.icon,
                color: body.color,
            },
        )
        .await?;
    JsonApiResponse::created(category.into())
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<CategoryResponse>> {
    let categories = category_service(&state).list(&principal.sub).await?;
    JsonApiResponse::ok(categories.into_iter().map(CategoryResponse::from).collect())
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<CategoryResponse> {
    let category = category_service(&state).require(&principal.sub, &id).await?;
    JsonApiResponse::ok(category.into())
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let category = category_service(&state)
        .update(
            &principal.sub,
            &id,
            CategoryChanges {
                name: body.name,
                icon: body.icon,
                color: body.color,
            },
        )
        .await?;
    JsonApiResponse::ok(category.into())
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    category_service(&state).delete(&principal.sub, &id).await?;
    JsonApiResponse::ok(MessageResponse::new("Category deleted successfully"))
}

fn category_service(state: &AppState) -> CategoryService {
    ServiceContext::from_state(state).category()
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            color: model.color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
