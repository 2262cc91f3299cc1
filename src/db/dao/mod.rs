pub mod base;
pub mod base_traits;
pub mod budget_dao;
pub mod category_dao;
mod context;
pub mod error;
pub mod expense_dao;
pub mod refresh_token_dao;
pub mod user_dao;

pub use base::{DaoBase, MAX_WINDOW, Page};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use budget_dao::BudgetDao;
pub use category_dao::CategoryDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use expense_dao::ExpenseDao;
pub use refresh_token_dao::RefreshTokenDao;
pub use user_dao::UserDao;
