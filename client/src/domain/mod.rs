use std::time::Duration;

use artconnect_common::Storage;

use crate::domain::auth::{AuthFlow, AuthService};
use crate::domain::drafts::DraftStore;
use crate::domain::guard::InactivityGuard;
use crate::domain::session::{Navigator, SessionLogout, SessionStore};

pub mod analytics;
pub mod auth;
pub mod chatbot;
pub mod drafts;
pub mod explore;
pub mod guard;
pub mod session;
pub mod upload;

/// The application state shared between all UI adapters.
pub trait AppState: Clone + Send + Sync + 'static {
    type S: Storage;
    type A: AuthService;

    fn drafts(&self) -> &DraftStore<Self::S>;
    fn session(&self) -> &SessionStore<Self::S>;
    fn auth(&self) -> &AuthFlow<Self::A, Self::S>;
    fn idle_timeout(&self) -> Duration;

    /// Guard that logs this state's session out; the caller starts it on mount
    fn inactivity_guard<N: Navigator>(
        &self,
        navigator: N,
    ) -> InactivityGuard<SessionLogout<Self::S, N>> {
        let logout = SessionLogout::new(self.session().clone(), navigator);
        InactivityGuard::with_threshold(logout, self.idle_timeout())
    }
}
