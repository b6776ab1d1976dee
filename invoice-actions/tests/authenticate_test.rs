//! Sign-in action tests.

mod common;

use common::{auth_actions, StubVerifier, Verdict};
use invoice_actions::actions::AuthOutcome;
use invoice_actions::models::FormFields;
use invoice_actions::services::AuthErrorKind;
use service_core::error::AppError;

fn credentials() -> FormFields {
    FormFields::new()
        .with("email", "user@nextmail.com")
        .with("password", "123456")
}

#[tokio::test]
async fn accepted_credentials_sign_in() {
    let verifier = StubVerifier::new(Verdict::Accept);
    let actions = auth_actions(verifier.clone());

    let outcome = actions.authenticate(None, &credentials()).await.unwrap();

    assert!(matches!(outcome, AuthOutcome::SignedIn(ref t) if t.access_token == "access-token"));
    assert_eq!(
        verifier.calls.lock().unwrap().clone(),
        vec![(
            "credentials".to_string(),
            Some("user@nextmail.com".to_string())
        )]
    );
}

#[tokio::test]
async fn credentials_signin_maps_to_invalid_credentials() {
    let actions = auth_actions(StubVerifier::new(Verdict::Reject(
        AuthErrorKind::CredentialsSignin,
    )));

    let outcome = actions
        .authenticate(Some("previous message"), &credentials())
        .await
        .unwrap();

    assert_eq!(outcome, AuthOutcome::Rejected("Invalid credentials.".to_string()));
}

#[tokio::test]
async fn other_known_failures_map_to_generic_message() {
    for kind in [
        AuthErrorKind::AccessDenied,
        AuthErrorKind::Configuration,
        AuthErrorKind::CallbackRouteError,
        AuthErrorKind::Other("Verification".to_string()),
    ] {
        let actions = auth_actions(StubVerifier::new(Verdict::Reject(kind)));

        let outcome = actions.authenticate(None, &credentials()).await.unwrap();

        assert_eq!(outcome, AuthOutcome::Rejected("Something went wrong.".to_string()));
    }
}

#[tokio::test]
async fn unrecognized_failure_propagates() {
    let actions = auth_actions(StubVerifier::new(Verdict::Crash("socket closed")));

    let result = actions.authenticate(None, &credentials()).await;

    match result {
        Err(AppError::InternalError(cause)) => assert_eq!(cause.to_string(), "socket closed"),
        other => panic!("expected propagated error, got {:?}", other),
    }
}
