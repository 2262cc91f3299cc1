use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{auth, budgets, categories, expenses, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(categories::router(state.clone()))
        .merge(expenses::router(state.clone()))
        .merge(budgets::router(state))
}
