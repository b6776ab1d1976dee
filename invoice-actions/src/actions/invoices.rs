//! Create, update and delete invoice actions.
//!
//! Every action validates (where there is input), issues at most one write and
//! reports. Datastore failures become a flat message on [`State`]; the cause is
//! logged and never shown to the user.

use chrono::Utc;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::models::{ActionOutcome, FieldErrors, FormFields, InvoiceChanges, NewInvoice, State};
use crate::services::metrics::record_action;
use crate::services::{InvoiceRepository, ViewCache};
use crate::validation::validate_invoice_form;

pub const CREATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const CREATE_FAILED_MESSAGE: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED_MESSAGE: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED_MESSAGE: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETED_MESSAGE: &str = "Deleted Invoice!";

#[derive(Clone)]
pub struct InvoiceActions {
    repository: Arc<dyn InvoiceRepository>,
    cache: Arc<dyn ViewCache>,
    listing_path: String,
}

impl InvoiceActions {
    pub fn new(
        repository: Arc<dyn InvoiceRepository>,
        cache: Arc<dyn ViewCache>,
        listing_path: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            cache,
            listing_path: listing_path.into(),
        }
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    /// Create an invoice from a submitted form.
    ///
    /// Rejected input comes back as field errors. On success the listing is
    /// invalidated and the caller is sent to it. `_prev` is accepted for
    /// symmetry with the form contract and not read.
    #[instrument(skip_all)]
    pub async fn create_invoice(&self, _prev: &State, form: &FormFields) -> ActionOutcome {
        let input = match validate_invoice_form(form) {
            Ok(input) => input,
            Err(errors) => {
                debug!("Invoice form rejected");
                record_action("create", "invalid");
                return ActionOutcome::Respond(State::rejected(
                    FieldErrors::from(&errors),
                    CREATE_VALIDATION_MESSAGE,
                ));
            }
        };

        let invoice = NewInvoice {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            amount_in_cents: input.amount_in_cents,
            status: input.status,
            date: Utc::now().date_naive(),
        };

        if let Err(e) = self.repository.insert_invoice(&invoice).await {
            error!(error = %e, "Failed to create invoice");
            record_action("create", "db_error");
            return ActionOutcome::Respond(State::message(CREATE_FAILED_MESSAGE));
        }

        info!(
            invoice_id = %invoice.id,
            amount = invoice.amount_in_cents,
            status = invoice.status.as_str(),
            "Invoice created"
        );
        record_action("create", "ok");

        self.finish_with_redirect()
    }

    /// Update an invoice identified by a trusted `id`.
    ///
    /// Unlike create, invalid input is not turned into field errors: it is
    /// returned as `AppError::ValidationError`. The invoice date is left as is.
    #[instrument(skip(self, form))]
    pub async fn update_invoice(
        &self,
        id: &str,
        form: &FormFields,
    ) -> Result<ActionOutcome, AppError> {
        let input = validate_invoice_form(form).map_err(|errors| {
            record_action("update", "invalid");
            AppError::ValidationError(errors)
        })?;

        let changes = InvoiceChanges {
            customer_id: input.customer_id,
            amount_in_cents: input.amount_in_cents,
            status: input.status,
        };

        match self.repository.update_invoice(id, &changes).await {
            Ok(rows) => {
                // Zero rows is reported the same as an update.
                info!(rows_affected = rows, "Invoice updated");
                record_action("update", "ok");
                Ok(self.finish_with_redirect())
            }
            Err(e) => {
                error!(error = %e, "Failed to update invoice");
                record_action("update", "db_error");
                Ok(ActionOutcome::Respond(State::message(UPDATE_FAILED_MESSAGE)))
            }
        }
    }

    /// Delete an invoice. Succeeds in place (no redirect) with a message.
    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: &str) -> State {
        match self.repository.delete_invoice(id).await {
            Ok(rows) => {
                info!(rows_affected = rows, "Invoice deleted");
                record_action("delete", "ok");
                self.cache.invalidate(&self.listing_path);
                State::message(DELETED_MESSAGE)
            }
            Err(e) => {
                error!(error = %e, "Failed to delete invoice");
                record_action("delete", "db_error");
                State::message(DELETE_FAILED_MESSAGE)
            }
        }
    }

    fn finish_with_redirect(&self) -> ActionOutcome {
        self.cache.invalidate(&self.listing_path);
        ActionOutcome::Redirect(self.listing_path.clone())
    }
}
