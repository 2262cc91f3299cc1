use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::budget,
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse, MessageResponse},
    services::{
        ServiceContext,
        budget_service::{BudgetInput, BudgetService, BudgetStatus, BudgetUpdate, PeriodType},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub amount: f64,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub amount: Option<f64>,
    pub period_type: Option<PeriodType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBudgetsParams {
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: Uuid,
    pub amount: f64,
    pub period_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct BudgetWithStatusResponse {
    #[serde(flatten)]
    pub budget: BudgetResponse,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/budgets", post(create_budget).get(list_budgets))
        .route("/budgets/current", get(current_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).patch(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/status", get(budget_status))
        .with_state(state)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateBudgetRequest>,
) -> ApiResult<BudgetResponse> {
    let budget = budget_service(&state)
        .create(
            &principal.sub,
            BudgetInput {
                amount: body.amount,
                period_type: body.period_type,
                start_date: body.start_date,
                end_date: body.end_date,
            },
        )
        .await?;
    JsonApiResponse::created(budget.into())
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Query(params): Query<ListBudgetsParams>,
) -> ApiResult<Vec<BudgetResponse>> {
    let budgets = budget_service(&state)
        .list(&principal.sub, params.is_active)
        .await?;
    JsonApiResponse::ok(budgets.into_iter().map(BudgetResponse::from).collect())
}

async fn current_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Option<BudgetWithStatusResponse>> {
    let current = budget_service(&state)
        .current(&principal.sub, today())
        .await?;
    JsonApiResponse::ok(current.map(|(budget, status)| BudgetWithStatusResponse {
        budget: budget.into(),
        status,
    }))
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<BudgetResponse> {
    let budget = budget_service(&state).require(&principal.sub, &id).await?;
    JsonApiResponse::ok(budget.into())
}

async fn budget_status(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<BudgetStatus> {
    let status = budget_service(&state)
        .status(&principal.sub, &id, today())
        .await?;
    JsonApiResponse::ok(status)
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBudgetRequest>,
) -> ApiResult<BudgetResponse> {
    let budget = budget_service(&state)
        .update(
            &principal.sub,
            &id,
            BudgetUpdate {
                amount: body.amount,
                period_type: body.period_type,
                start_date: body.start_date,
                end_date: body.end_date,
                is_active: body.is_active,
            },
        )
        .await?;
    JsonApiResponse::ok(budget.into())
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    budget_service(&state).delete(&principal.sub, &id).await?;
    JsonApiResponse::ok(MessageResponse::new("Budget deleted successfully"))
}

fn budget_service(state: &AppState) -> BudgetService {
    ServiceContext::from_state(state).budget()
}

impl From<budget::Model> for BudgetResponse {
    fn from(model: budget::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            period_type: model.period_type,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
