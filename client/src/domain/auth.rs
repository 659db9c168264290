use std::fmt;
use std::future::Future;

use artconnect_common::{Storage, StorageError};
use nutype::nutype;
use serde::Serialize;
use thiserror::Error;

use crate::domain::session::{SessionStore, SessionToken};

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize)
)]
pub struct Username(String);

// no Debug/Display, passwords stay out of logs
#[nutype(
    validate(not_empty, len_char_max = 128),
    derive(Clone, AsRef, PartialEq, Eq, Serialize)
)]
pub struct Password(String);

/// Request body of both auth endpoints
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: Username,
    pub password: Password,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, FormError> {
        let username =
            Username::try_new(username.into()).map_err(|err| FormError::InvalidUsername(err.to_string()))?;
        let password =
            Password::try_new(password.into()).map_err(|err| FormError::InvalidPassword(err.to_string()))?;
        Ok(Self { username, password })
    }
}

/// Sign-up form as typed by the user
#[derive(Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

impl SignUpForm {
    pub fn validate(self) -> Result<Credentials, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Credentials::new(self.username, self.password)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Please fill in all required fields")]
    MissingRequiredFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::SignIn => "/api/auth/signin",
            AuthMode::SignUp => "/api/auth/signup",
        }
    }

    /// Message shown when the backend rejects without an `error` field
    pub fn failure_fallback(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Signin failed.",
            AuthMode::SignUp => "Signup failed.",
        }
    }
}

/// Successful backend answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    pub token: Option<SessionToken>,
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend answered with a non-success status, message is its `error` field
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("cannot connect to backend: {0}")]
    Network(String),

    #[error("server returned invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text for the auth form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } => message.clone(),
            AuthError::Network(_) => "Network error. Please try again.".to_string(),
            AuthError::InvalidResponse(_) => "Server returned invalid response.".to_string(),
            AuthError::Storage(_) => "Could not save session. Please try again.".to_string(),
        }
    }
}

/// Port to the external auth backend
pub trait AuthService: Clone + Send + Sync + 'static {
    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthSuccess, AuthError>> + Send;

    fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthSuccess, AuthError>> + Send;
}

/// Auth calls plus bookkeeping of the session marker
#[derive(Clone, Debug)]
pub struct AuthFlow<A: AuthService, S: Storage> {
    service: A,
    session: SessionStore<S>,
}

impl<A: AuthService, S: Storage> AuthFlow<A, S> {
    pub fn new(service: A, session: SessionStore<S>) -> Self {
        Self { service, session }
    }

    /// Sign in and keep the returned token as session marker.
    /// Nothing is stored when the backend rejects the credentials.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        let success = self.service.sign_in(credentials).await.inspect_err(|err| {
            tracing::info!(username = %credentials.username, "sign-in failed: {}", err);
        })?;

        if let Some(token) = &success.token {
            self.session.store(token).await?;
        }

        tracing::info!(username = %credentials.username, "signed in");
        Ok(success)
    }

    /// Register a new account; the user signs in separately afterwards
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        let success = self.service.sign_up(credentials).await.inspect_err(|err| {
            tracing::info!(username = %credentials.username, "sign-up failed: {}", err);
        })?;

        tracing::info!(username = %credentials.username, "signed up");
        Ok(success)
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }
}
