use axum::http::StatusCode;
use thiserror::Error;

use crate::db::dao::DaoLayerError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Uniform rejection used by both token validators.
    pub fn session_rejected() -> Self {
        Self::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { entity, .. } => {
                AppError::not_found(format!("{} not found", entity_label(entity)))
            }
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(source) => {
                tracing::error!(error = %source, "database operation failed");
                AppError::internal("Internal server error")
            }
        }
    }
}

// "finance_tracker::db::entities::expense::Entity" -> "Expense"
fn entity_label(type_name: &str) -> String {
    let module = type_name
        .rsplit("::")
        .nth(1)
        .unwrap_or("Resource");
    let mut chars = module.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => "Resource".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn not_found_uses_entity_module_name() {
        let err = AppError::from(DaoLayerError::NotFound {
            entity: "finance_tracker::db::entities::expense::Entity",
            id: Uuid::new_v4(),
        });

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Expense not found");
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = AppError::from(DaoLayerError::Db(DbErr::Custom(
            "relation \"users\" does not exist".to_string(),
        )));

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn invalid_pagination_is_a_bad_request() {
        let err = AppError::from(DaoLayerError::InvalidPagination {
            page: 0,
            page_size: 10,
        });

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
