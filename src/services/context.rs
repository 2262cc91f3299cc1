use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::TokenIssuer,
    db::dao::DaoContext,
    services::{
        budget_service::BudgetService, category_service::CategoryService,
        expense_service::ExpenseService, session_service::SessionService,
        user_service::UserService,
    },
    state::AppState,
};

/// Builds request-scoped services over the shared pool.
#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    tokens: TokenIssuer,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection, tokens: &TokenIssuer) -> Self {
        Self {
            daos: DaoContext::new(db),
            tokens: tokens.clone(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db, &state.tokens)
    }

    pub fn session(&self) -> SessionService {
        SessionService::new(
            self.daos.user(),
            self.daos.refresh_token(),
            self.tokens.clone(),
        )
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user(), self.daos.refresh_token())
    }

    pub fn category(&self) -> CategoryService {
        CategoryService::new(self.daos.category(), self.daos.expense())
    }

    pub fn expense(&self) -> ExpenseService {
        ExpenseService::new(self.daos.expense(), self.daos.category())
    }

    pub fn budget(&self) -> BudgetService {
        BudgetService::new(self.daos.budget(), self.daos.expense())
    }
}
