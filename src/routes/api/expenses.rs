use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::expense_dao::{ExpenseChanges, ExpenseFilter, NewExpense},
    db::entities::category,
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse, MessageResponse},
    services::{
        ServiceContext,
        expense_service::{ExpenseDetails, ExpensePage, ExpenseQuery, ExpenseService},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub name: String,
    pub amount: f64,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub category: Option<CategorySummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseResponse>,
    pub pagination: Pagination,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/expenses", post(create_expense).get(list_expenses))
        .route("/expenses/recent", get(recent_expenses))
        .route(
            "/expenses/{id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
        .with_state(state)
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateExpenseRequest>,
) -> ApiResult<ExpenseResponse> {
    let details = expense_service(&state)
        .create(
            &principal.sub,
            NewExpense {
                name: body.name,
                amount: body.amount,
                category_id: body.category_id,
                date: body.date,
                notes: body.notes,
            },
        )
        .await?;
    JsonApiResponse::created(details.into())
}

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Query(params): Query<ListExpensesParams>,
) -> ApiResult<ExpenseListResponse> {
    let query = ExpenseQuery {
        page: params.page,
        limit: params.limit,
        filter: ExpenseFilter {
            start_date: params.start_date,
            end_date: params.end_date,
            category_id: params.category_id,
        },
    };
    let page = expense_service(&state).list(&principal.sub, query).await?;
    JsonApiResponse::ok(page.into())
}

async fn recent_expenses(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Query(params): Query<RecentParams>,
) -> ApiResult<Vec<ExpenseResponse>> {
    let expenses = expense_service(&state)
        .recent(&principal.sub, params.limit)
        .await?;
    JsonApiResponse::ok(expenses.into_iter().map(ExpenseResponse::from).collect())
}

async fn get_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ExpenseResponse> {
    let details = expense_service(&state).get(&principal.sub, &id).await?;
    JsonApiResponse::ok(details.into())
}

async fn update_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateExpenseRequest>,
) -> ApiResult<ExpenseResponse> {
    let details = expense_service(&state)
        .update(
            &principal.sub,
            &id,
            ExpenseChanges {
                name: body.name,
                amount: body.amount,
                category_id: body.category_id,
                date: body.date,
                notes: body.notes,
            },
        )
        .await?;
    JsonApiResponse::ok(details.into())
}

async fn delete_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    expense_service(&state).delete(&principal.sub, &id).await?;
    JsonApiResponse::ok(MessageResponse::new("Expense deleted successfully"))
}

fn expense_service(state: &AppState) -> ExpenseService {
    ServiceContext::from_state(state).expense()
}

impl From<category::Model> for CategorySummary {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            color: model.color,
        }
    }
}

impl From<ExpenseDetails> for ExpenseResponse {
    fn from(details: ExpenseDetails) -> Self {
        let ExpenseDetails { expense, category } = details;
        Self {
            id: expense.id,
            name: expense.name,
            amount: expense.amount,
            category_id: expense.category_id,
            date: expense.date,
            notes: expense.notes,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
            category: category.map(CategorySummary::from),
        }
    }
}

impl From<ExpensePage> for ExpenseListResponse {
    fn from(page: ExpensePage) -> Self {
        Self {
            expenses: page.expenses.into_iter().map(ExpenseResponse::from).collect(),
            pagination: Pagination {
                total: page.total,
                page: page.page,
                limit: page.limit,
                total_pages: page.total_pages,
            },
        }
    }
}
