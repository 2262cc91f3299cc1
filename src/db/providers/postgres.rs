use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{Store, pool_options};
use crate::config::DatabaseConfig;

pub struct PostgresStore;

#[async_trait]
impl Store for PostgresStore {
    async fn open(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(Database::connect(pool_options(cfg)).await?)
    }
}
