use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::jwt::TokenIssuer, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, tokens: TokenIssuer) -> Arc<Self> {
        Arc::new(Self { config, db, tokens })
    }
}
