//! HTTP bindings for the invoice actions.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use service_core::error::AppError;

use crate::models::{ActionOutcome, FormFields, State as FormState};
use crate::AppState;

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Respond(state) => Json(state).into_response(),
            ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
        }
    }
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> ActionOutcome {
    state
        .invoices
        .create_invoice(&FormState::default(), &fields)
        .await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<ActionOutcome, AppError> {
    state.invoices.update_invoice(&id, &fields).await
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<FormState> {
    Json(state.invoices.delete_invoice(&id).await)
}

/// Invoice listing as JSON, served from the listing cache.
pub async fn list_invoices(State(state): State<AppState>) -> Result<Response, AppError> {
    let path = state.invoices.listing_path().to_string();
    let repository = state.repository.clone();

    let body = state
        .listing
        .get_or_render(&path, move || async move {
            let invoices = repository.list_invoices().await?;
            serde_json::to_string(&invoices)
                .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to render listing: {}", e)))
        })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body.as_str().to_owned()).into_response())
}
