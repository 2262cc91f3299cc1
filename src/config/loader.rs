use std::{collections::HashMap, path::Path};

use ::config as config_rs;
use anyhow::{Context, Result};

use super::{AppConfig, validate};

pub const ENV_PREFIX: &str = "APP";
pub const ENV_SEPARATOR: &str = "__";
/// Optional TOML file layered underneath the environment.
pub const CONFIG_FILE_VAR: &str = "APP_CONFIG_FILE";

fn load_dotenv() {
    // crate root first, then whatever dotenvy finds walking up from cwd
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}

/// Reads `.env`, the optional config file, then `APP_*` variables.
pub fn load() -> Result<AppConfig> {
    load_dotenv();
    let file = std::env::var(CONFIG_FILE_VAR).ok();
    build(file.as_deref(), None)
}

/// `vars` replaces the process environment when given.
pub(crate) fn build(file: Option<&str>, vars: Option<HashMap<String, String>>) -> Result<AppConfig> {
    let mut builder = config_rs::Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(config_rs::File::with_name(path).required(true));
    }

    let settings = builder
        .add_source(
            config_rs::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(vars),
        )
        .build()
        .context("failed to read finance tracker configuration")?;

    let cfg: AppConfig = settings
        .try_deserialize()
        .context("configuration does not match the expected shape")?;
    validate::validate(&cfg)?;
    Ok(cfg)
}
