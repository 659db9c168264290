use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use artconnect_common::database::DatabaseSettings;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub auth: AuthSettings,
    #[serde(default)]
    pub session: SessionSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub idle_timeout_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: 10 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageSettings {
    Memory {
        #[serde(default)]
        quota_bytes: Option<usize>,
    },
    Postgres {
        database: DatabaseSettings,
    },
}

fn default_request_timeout() -> u64 {
    30
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");
        Self::load(Path::new("./config"), &run_mode)
    }

    /// `<config_dir>/default`, then optional `<config_dir>/<run_mode>`, then `ARTCONNECT__*` variables
    pub fn load(config_dir: &Path, run_mode: &str) -> anyhow::Result<Self> {
        let s = Config::builder()
            .add_source(File::from(config_dir.join("default")))
            .add_source(File::from(config_dir.join(run_mode)).required(false))
            .add_source(Environment::with_prefix("ARTCONNECT").separator("__"))
            .build()
            .with_context(|| format!("failed to load config from {}", config_dir.display()))?;

        s.try_deserialize().with_context(|| "failed to read config")
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session.idle_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.auth.request_timeout_seconds)
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
