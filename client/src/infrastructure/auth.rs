use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::domain::auth::{AuthError, AuthMode, AuthService, AuthSuccess, Credentials};
use crate::domain::session::SessionToken;

/// Body both auth endpoints answer with
#[derive(Debug, Default, Deserialize)]
struct AuthResponseBody {
    token: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Talks JSON to `<base_url>/api/auth/*`
#[derive(Clone, Debug)]
pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build auth http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, mode: AuthMode, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        let url = format!("{}{}", self.base_url, mode.endpoint());
        tracing::debug!(%url, "auth request");

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let status = response.status();
        let body: AuthResponseBody = response
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: body
                    .error
                    .unwrap_or_else(|| mode.failure_fallback().to_string()),
            });
        }

        // an empty token means the server issued none
        let token = body
            .token
            .filter(|token| !token.trim().is_empty())
            .map(SessionToken::try_new)
            .transpose()
            .map_err(|err| AuthError::InvalidResponse(format!("bad token: {}", err)))?;

        Ok(AuthSuccess {
            token,
            message: body.message,
        })
    }
}

impl AuthService for HttpAuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        self.post(AuthMode::SignIn, credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        self.post(AuthMode::SignUp, credentials).await
    }
}
