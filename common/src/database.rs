use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use sqlx::{
    Executor, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};

/// Pool plus the schema every statement is qualified with
#[derive(Clone, Debug)]
pub struct Database {
    database_pool: PgPool,
    database_schema: String,
}

/// `storage.database` block of the config files
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub db: String,
    pub schema: String,
    pub credentials: DatabaseCredentials,
    pub connection: DatabaseConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConnection {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    5432
}

impl DatabaseSettings {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.credentials.username)
            .password(&self.credentials.password)
            .database(&self.db)
            .ssl_mode(PgSslMode::Prefer)
    }

    fn pool_options(&self) -> PgPoolOptions {
        let connection = &self.connection;
        PgPoolOptions::new()
            .min_connections(connection.min_connections)
            .max_connections(connection.max_connections)
            .acquire_timeout(Duration::from_secs(connection.acquire_timeout_seconds))
    }

    /// host:port/db, never the credentials
    fn location(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db)
    }
}

impl Database {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, anyhow::Error> {
        let database_pool = settings
            .pool_options()
            .connect_with(settings.connect_options())
            .await
            .with_context(|| format!("failed to open database at {}", settings.location()))?;

        tracing::info!(location = %settings.location(), schema = %settings.schema, "connected to database");

        Ok(Self {
            database_pool,
            database_schema: settings.schema.clone(),
        })
    }

    /// Run `statements` in one transaction, `ctx` names the step in logs and errors
    pub async fn execute_in_transaction(
        &self,
        statements: Vec<String>,
        ctx: &'static str,
    ) -> Result<(), anyhow::Error> {
        let mut transaction = self
            .database_pool
            .begin()
            .await
            .with_context(|| format!("failed to start {} transaction", ctx))?;

        tracing::info!(ctx, statements = statements.len(), "applying migration step");

        for statement in statements {
            tracing::debug!(%statement);
            transaction
                .execute(sqlx::query(&statement))
                .await
                .with_context(|| format!("{} failed: {}", ctx, statement))?;
        }

        transaction
            .commit()
            .await
            .with_context(|| format!("failed to commit {} transaction", ctx))
    }

    pub fn database_pool(&self) -> &PgPool {
        &self.database_pool
    }

    pub fn database_schema(&self) -> &str {
        &self.database_schema
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings() -> DatabaseSettings {
        serde_json::from_value(json!({
            "host": "db.internal",
            "db": "artconnect",
            "schema": "client",
            "credentials": {"username": "artconnect", "password": "s3cret"},
            "connection": {
                "min_connections": 1,
                "max_connections": 8,
                "acquire_timeout_seconds": 3
            }
        }))
        .unwrap()
    }

    #[test]
    fn port_defaults_to_postgres_port() {
        assert_eq!(settings().port, 5432);
    }

    #[test]
    fn connect_options_follow_settings() {
        let options = DatabaseSettings {
            port: 6543,
            ..settings()
        }
        .connect_options();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "artconnect");
        assert_eq!(options.get_database(), Some("artconnect"));
    }

    #[test]
    fn pool_options_follow_connection_block() {
        let options = settings().pool_options();

        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_max_connections(), 8);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn location_hides_credentials() {
        let location = settings().location();
        assert_eq!(location, "db.internal:5432/artconnect");
        assert!(!location.contains("s3cret"));
    }
}
