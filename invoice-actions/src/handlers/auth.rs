use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use service_core::error::AppError;
use tower_sessions::Session;

use crate::actions::AuthOutcome;
use crate::models::FormFields;
use crate::AppState;

pub const DASHBOARD_PATH: &str = "/dashboard";

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(credentials): Form<FormFields>,
) -> Result<Response, AppError> {
    match state.auth.authenticate(None, &credentials).await? {
        AuthOutcome::SignedIn(tokens) => {
            session
                .insert("access_token", &tokens.access_token)
                .await
                .map_err(|e| AppError::InternalError(anyhow::anyhow!("Session write failed: {}", e)))?;
            if let Some(refresh_token) = &tokens.refresh_token {
                session
                    .insert("refresh_token", refresh_token)
                    .await
                    .map_err(|e| {
                        AppError::InternalError(anyhow::anyhow!("Session write failed: {}", e))
                    })?;
            }

            // HTMX Redirect to dashboard
            let mut headers = HeaderMap::new();
            headers.insert("HX-Redirect", HeaderValue::from_static(DASHBOARD_PATH));
            Ok((StatusCode::OK, headers, "").into_response())
        }
        AuthOutcome::Rejected(message) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(format!("<p class='text-red-500 text-sm'>{}</p>", message)),
        )
            .into_response()),
    }
}
