use artconnect_common::{SlotName, Storage, StorageError};
use nutype::nutype;

use crate::domain::guard::IdleAction;

/// Opaque token returned by the auth backend on sign-in
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct SessionToken(String);

/// The session marker slot
#[derive(Clone, Debug)]
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored token; a blank stored value counts as no session
    pub async fn token(&self) -> Result<Option<SessionToken>, StorageError> {
        let raw = self.storage.get(SlotName::token()).await?;
        Ok(raw.and_then(|value| SessionToken::try_new(value).ok()))
    }

    pub async fn store(&self, token: &SessionToken) -> Result<(), StorageError> {
        self.storage
            .set(SlotName::token(), token.as_ref().to_owned())
            .await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.delete(SlotName::token()).await
    }

    pub async fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.token().await?.is_some())
    }
}

/// Routed views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Dashboard,
    Explore,
    Lessons,
    Trends,
    Community,
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::Explore => "/explore",
            Route::Lessons => "/lessons",
            Route::Trends => "/trends",
            Route::Community => "/community",
            Route::NotFound => "*",
        }
    }

    /// Unknown paths fall through to `NotFound`
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Landing,
            "/dashboard" => Route::Dashboard,
            "/explore" => Route::Explore,
            "/lessons" => Route::Lessons,
            "/trends" => Route::Trends,
            "/community" => Route::Community,
            _ => Route::NotFound,
        }
    }
}

/// Port to whatever renders the views
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: Route);
}

/// Clears the session marker and sends the user back to the landing view
#[derive(Clone, Debug)]
pub struct SessionLogout<S: Storage, N: Navigator> {
    session: SessionStore<S>,
    navigator: N,
}

impl<S: Storage, N: Navigator> SessionLogout<S, N> {
    pub fn new(session: SessionStore<S>, navigator: N) -> Self {
        Self { session, navigator }
    }

    /// Never fails: a storage error is logged and navigation still happens
    pub async fn logout(&self) {
        if let Err(err) = self.session.clear().await {
            tracing::warn!("failed to clear session marker: {}", err);
        }
        self.navigator.navigate(Route::Landing);
    }
}

impl<S: Storage, N: Navigator> IdleAction for SessionLogout<S, N> {
    async fn on_idle(&self) {
        self.logout().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use artconnect_common::InMemoryStorage;
    use artconnect_common::test_utils::UnavailableStorage;

    use crate::domain::guard::InactivityGuard;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingNavigator {
        visited: Arc<Mutex<Vec<Route>>>,
    }

    impl RecordingNavigator {
        fn visited(&self) -> Vec<Route> {
            self.visited.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.visited.lock().unwrap().push(route);
        }
    }

    fn token(value: &str) -> SessionToken {
        SessionToken::try_new(value).unwrap()
    }

    #[tokio::test]
    async fn store_and_clear_token() {
        let session = SessionStore::new(InMemoryStorage::new());
        assert!(!session.is_authenticated().await.unwrap());

        session.store(&token("jwt-123")).await.unwrap();
        assert_eq!(session.token().await.unwrap(), Some(token("jwt-123")));
        assert!(session.is_authenticated().await.unwrap());

        session.clear().await.unwrap();
        session.clear().await.unwrap();
        assert_eq!(session.token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_stored_token_is_no_session() {
        let storage = InMemoryStorage::new();
        storage.set(SlotName::token(), "  ".to_string()).await.unwrap();
        let session = SessionStore::new(storage);
        assert!(!session.is_authenticated().await.unwrap());
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(SessionToken::try_new("   ").is_err());
    }

    #[test]
    fn routes_round_trip_paths() {
        for route in [
            Route::Landing,
            Route::Dashboard,
            Route::Explore,
            Route::Lessons,
            Route::Trends,
            Route::Community,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/explore/"), Route::Explore);
        assert_eq!(Route::from_path("/analytics"), Route::NotFound);
    }

    #[tokio::test]
    async fn logout_clears_marker_and_navigates_home() {
        let storage = InMemoryStorage::new();
        let session = SessionStore::new(storage.clone());
        session.store(&token("jwt-123")).await.unwrap();
        let navigator = RecordingNavigator::default();

        SessionLogout::new(session.clone(), navigator.clone())
            .logout()
            .await;

        assert_eq!(session.token().await.unwrap(), None);
        assert_eq!(navigator.visited(), vec![Route::Landing]);
    }

    #[tokio::test]
    async fn logout_survives_storage_failure() {
        let navigator = RecordingNavigator::default();
        SessionLogout::new(SessionStore::new(UnavailableStorage), navigator.clone())
            .logout()
            .await;
        assert_eq!(navigator.visited(), vec![Route::Landing]);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_guard_clears_session() {
        let storage = InMemoryStorage::new();
        let session = SessionStore::new(storage);
        session.store(&token("jwt-123")).await.unwrap();
        let navigator = RecordingNavigator::default();

        let guard = InactivityGuard::new(SessionLogout::new(session.clone(), navigator.clone()));
        guard.start();
        tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;

        assert_eq!(session.token().await.unwrap(), None);
        assert_eq!(navigator.visited(), vec![Route::Landing]);
    }
}
