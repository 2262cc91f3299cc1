use anyhow::{Result, bail};

use super::{
    AppConfig,
    defaults::{MAX_ACCESS_TTL_SECS, MAX_REFRESH_TTL_DAYS},
};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.max_connections == 0 {
            errors.push("database.max_connections must be > 0".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.access_secret.trim().is_empty() {
            errors.push("auth.access_secret must not be empty".to_string());
        }

        if auth.refresh_secret.trim().is_empty() {
            errors.push("auth.refresh_secret must not be empty".to_string());
        }

        if !auth.access_secret.is_empty() && auth.access_secret == auth.refresh_secret {
            errors.push("auth.access_secret and auth.refresh_secret must differ".to_string());
        }

        if auth.access_ttl_secs == 0 || auth.access_ttl_secs > MAX_ACCESS_TTL_SECS {
            errors.push(format!(
                "auth.access_ttl_secs must be within 1..={MAX_ACCESS_TTL_SECS}"
            ));
        }

        if auth.refresh_ttl_days <= 0 || auth.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            errors.push(format!(
                "auth.refresh_ttl_days must be within 1..={MAX_REFRESH_TTL_DAYS}"
            ));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
