pub mod budget_service;
pub mod category_service;
pub mod context;
pub mod expense_service;
pub mod session_service;
pub mod user_service;

pub use context::ServiceContext;

use sea_orm::SqlErr;

use crate::{db::dao::DaoLayerError, error::AppError};

/// Maps a unique-constraint violation to `Conflict`; a concurrent writer can
/// slip past the service's own existence check.
pub(crate) fn conflict_on_unique(err: DaoLayerError, message: &str) -> AppError {
    match &err {
        DaoLayerError::Db(db_err)
            if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
        {
            AppError::conflict(message)
        }
        _ => err.into(),
    }
}

pub(crate) fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn positive_amount(amount: f64) -> Result<f64, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::bad_request("Amount must be greater than 0"));
    }
    Ok(amount)
}
