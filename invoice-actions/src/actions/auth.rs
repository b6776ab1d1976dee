//! Sign-in action.

use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::FormFields;
use crate::services::{AuthErrorKind, CredentialVerifier, SignInError, SignedIn};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const GENERIC_AUTH_MESSAGE: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The verifier accepted the credentials; the caller establishes the session.
    SignedIn(SignedIn),
    /// A display string for the login form.
    Rejected(String),
}

#[derive(Clone)]
pub struct AuthActions {
    verifier: Arc<dyn CredentialVerifier>,
    strategy: String,
}

impl AuthActions {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, strategy: impl Into<String>) -> Self {
        Self {
            verifier,
            strategy: strategy.into(),
        }
    }

    /// Sign in with the submitted credentials.
    ///
    /// Known verifier failures map to a display string. Failures outside the
    /// verifier's taxonomy are returned as errors with their cause intact.
    /// `_prev` is the previously displayed message and is not read.
    #[instrument(skip_all, fields(strategy = %self.strategy))]
    pub async fn authenticate(
        &self,
        _prev: Option<&str>,
        credentials: &FormFields,
    ) -> Result<AuthOutcome, AppError> {
        match self.verifier.sign_in(&self.strategy, credentials).await {
            Ok(signed_in) => {
                info!("User signed in");
                Ok(AuthOutcome::SignedIn(signed_in))
            }
            Err(SignInError::Auth(err)) => {
                warn!(kind = %err.kind, "Sign-in rejected");
                let message = match err.kind {
                    AuthErrorKind::CredentialsSignin => INVALID_CREDENTIALS_MESSAGE,
                    _ => GENERIC_AUTH_MESSAGE,
                };
                Ok(AuthOutcome::Rejected(message.to_string()))
            }
            Err(SignInError::Unexpected(cause)) => Err(AppError::InternalError(cause)),
        }
    }
}
