//! Credential verification.
//!
//! The verifier is a black box to the sign-in action: it either signs the user
//! in or fails with an [`AuthError`] from a known taxonomy. Anything outside
//! that taxonomy is [`SignInError::Unexpected`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::AuthProviderSettings;
use crate::models::FormFields;

/// Failure kinds reported by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    CredentialsSignin,
    AccessDenied,
    Configuration,
    CallbackRouteError,
    Other(String),
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::AccessDenied => "AccessDenied",
            AuthErrorKind::Configuration => "Configuration",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
            AuthErrorKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {detail}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub detail: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Tokens issued for a verified user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedIn {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &FormFields,
    ) -> Result<SignedIn, SignInError>;
}

/// Verifies email/password credentials against the auth provider's
/// `/auth/login` endpoint.
pub struct HttpCredentialVerifier {
    client: Client,
    settings: AuthProviderSettings,
}

impl HttpCredentialVerifier {
    pub const STRATEGY: &'static str = "credentials";

    pub fn new(settings: AuthProviderSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }
}

#[async_trait]
impl CredentialVerifier for HttpCredentialVerifier {
    #[instrument(skip(self, credentials))]
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &FormFields,
    ) -> Result<SignedIn, SignInError> {
        if strategy != Self::STRATEGY {
            return Err(AuthError::new(
                AuthErrorKind::Configuration,
                format!("unsupported sign-in strategy '{}'", strategy),
            )
            .into());
        }

        let (Some(email), Some(password)) = (credentials.get("email"), credentials.get("password"))
        else {
            return Err(
                AuthError::new(AuthErrorKind::CredentialsSignin, "missing email or password").into(),
            );
        };

        let url = format!("{}/auth/login", self.settings.url);
        let response = self
            .client
            .traced_post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request to {} failed: {}", url, e))?;

        let status = response.status();
        if status.is_success() {
            let tokens: SignedIn = response
                .json()
                .await
                .map_err(|e| anyhow::anyhow!("Malformed token response: {}", e))?;
            info!("Credentials verified");
            return Ok(tokens);
        }

        warn!(status = %status, "Auth provider rejected sign-in");
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                AuthErrorKind::CredentialsSignin
            }
            StatusCode::FORBIDDEN => AuthErrorKind::AccessDenied,
            _ => AuthErrorKind::CallbackRouteError,
        };

        Err(AuthError::new(kind, format!("auth provider returned {}", status)).into())
    }
}
