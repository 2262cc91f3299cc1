use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::StoreKind;
use crate::config::DatabaseConfig;

/// Opens a pool for the backend named by the URL scheme and brings the
/// schema in line with the registered entities.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let kind = StoreKind::from_url(&cfg.url)?;
    info!(backend = kind.as_str(), "connecting to database");

    let store = kind.store();
    let db = store.open(cfg).await?;
    store.prepare(&db).await?;

    info!("syncing database schema from entities");
    db.get_schema_registry("finance_tracker::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}
