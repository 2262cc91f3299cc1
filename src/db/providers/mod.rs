//! Database backends the tracker can run on. The URL scheme picks one.

mod postgres;
mod sqlite;

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};

use self::{postgres::PostgresStore, sqlite::SqliteStore};
use crate::config::DatabaseConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Sqlite => "sqlite",
        }
    }

    /// Resolves the backend from the scheme of `url`.
    pub fn from_url(url: &str) -> Result<Self> {
        let lowered = url.trim().to_ascii_lowercase();
        let scheme = lowered.split_once(':').map(|(scheme, _)| scheme);
        match scheme {
            Some("postgres" | "postgresql") if lowered.contains("://") => Ok(StoreKind::Postgres),
            Some("sqlite") => Ok(StoreKind::Sqlite),
            _ => Err(anyhow!(
                "unsupported database url '{}'; expected postgres://, postgresql:// or sqlite:",
                redact_url(url)
            )),
        }
    }

    pub fn store(self) -> &'static dyn Store {
        match self {
            StoreKind::Postgres => &PostgresStore,
            StoreKind::Sqlite => &SqliteStore,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn open(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;

    /// Session settings applied once the pool is up.
    async fn prepare(&self, _db: &DatabaseConnection) -> Result<()> {
        Ok(())
    }
}

fn pool_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(CONNECT_TIMEOUT)
        .sqlx_logging(false);
    options
}

fn redact_url(url: &str) -> String {
    match url.trim().split_once(':') {
        Some((scheme, rest)) if rest.starts_with("//") => format!("{scheme}://<redacted>"),
        Some((scheme, _)) => format!("{scheme}:<redacted>"),
        None => "<invalid-url>".to_string(),
    }
}
