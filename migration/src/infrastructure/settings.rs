use std::env;

use anyhow::{Context, bail};
use artconnect_common::database::DatabaseSettings;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;

/// Reads the same config files as the client, only the storage section matters here
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    pub backend: String,
    pub database: Option<DatabaseSettings>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("ARTCONNECT").separator("__"))
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }

    /// Database to migrate; fails unless the postgres backend is configured
    pub fn database(&self) -> anyhow::Result<&DatabaseSettings> {
        match (&self.storage.backend[..], &self.storage.database) {
            ("postgres", Some(database)) => Ok(database),
            ("postgres", None) => bail!("storage.database section is missing"),
            (backend, _) => bail!("storage backend '{}' needs no migration", backend),
        }
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
