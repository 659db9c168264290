use std::time::Duration;

use artconnect_common::database::Database;
use artconnect_common::{InMemoryStorage, PostgresStorage, SlotName, Storage, StorageError};

use crate::domain::AppState;
use crate::domain::auth::AuthFlow;
use crate::domain::drafts::DraftStore;
use crate::domain::session::SessionStore;
use crate::infrastructure::auth::HttpAuthClient;
use crate::infrastructure::settings::{Settings, StorageSettings};

pub mod auth;
pub mod settings;

/// Storage backend chosen by configuration
#[derive(Clone, Debug)]
pub enum StorageAdapter {
    Memory(InMemoryStorage),
    Postgres(PostgresStorage),
}

impl StorageAdapter {
    pub async fn connect(settings: &StorageSettings) -> anyhow::Result<Self> {
        match settings {
            StorageSettings::Memory { quota_bytes: None } => Ok(Self::Memory(InMemoryStorage::new())),
            StorageSettings::Memory {
                quota_bytes: Some(quota),
            } => Ok(Self::Memory(InMemoryStorage::with_quota(*quota))),
            StorageSettings::Postgres { database } => {
                let database = Database::connect(database).await?;
                Ok(Self::Postgres(PostgresStorage::new(database)))
            }
        }
    }
}

impl Storage for StorageAdapter {
    async fn get(&self, slot: &SlotName) -> Result<Option<String>, StorageError> {
        match self {
            StorageAdapter::Memory(storage) => storage.get(slot).await,
            StorageAdapter::Postgres(storage) => storage.get(slot).await,
        }
    }

    async fn set(&self, slot: &SlotName, value: String) -> Result<(), StorageError> {
        match self {
            StorageAdapter::Memory(storage) => storage.set(slot, value).await,
            StorageAdapter::Postgres(storage) => storage.set(slot, value).await,
        }
    }

    async fn delete(&self, slot: &SlotName) -> Result<(), StorageError> {
        match self {
            StorageAdapter::Memory(storage) => storage.delete(slot).await,
            StorageAdapter::Postgres(storage) => storage.delete(slot).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppStateImpl {
    drafts: DraftStore<StorageAdapter>,
    session: SessionStore<StorageAdapter>,
    auth: AuthFlow<HttpAuthClient, StorageAdapter>,
    idle_timeout: Duration,
}

impl AppStateImpl {
    pub fn new(storage: StorageAdapter, auth_client: HttpAuthClient, idle_timeout: Duration) -> Self {
        let session = SessionStore::new(storage.clone());
        Self {
            drafts: DraftStore::new(storage),
            auth: AuthFlow::new(auth_client, session.clone()),
            session,
            idle_timeout,
        }
    }

    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let storage = StorageAdapter::connect(&settings.storage).await?;
        let auth_client = HttpAuthClient::new(&settings.auth.base_url, settings.request_timeout())?;
        tracing::info!(auth = %settings.auth.base_url, "client state ready");
        Ok(Self::new(storage, auth_client, settings.idle_timeout()))
    }
}

impl AppState for AppStateImpl {
    type S = StorageAdapter;
    type A = HttpAuthClient;

    fn drafts(&self) -> &DraftStore<Self::S> {
        &self.drafts
    }

    fn session(&self) -> &SessionStore<Self::S> {
        &self.session
    }

    fn auth(&self) -> &AuthFlow<Self::A, Self::S> {
        &self.auth
    }

    fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}
