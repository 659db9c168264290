use artconnect_common::database::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    domain::migration::Migration,
    infrastructure::{persistence::PersistenceAdapter, settings::Settings},
};

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!("configuration loaded");

    let database = Database::connect(settings.database()?).await?;
    let persistence = PersistenceAdapter::new(database);

    // create storage slot tables the client's postgres backend expects
    let migration = Migration::new(persistence);
    if let Err(err) = migration.migrate().await {
        tracing::error!("migration failed: {:?}", err);
        return Err(err);
    }

    Ok(())
}
