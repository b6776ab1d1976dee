//! Domain models for invoice-actions.

mod form;
mod invoice;
mod state;

pub use form::FormFields;
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use state::{ActionOutcome, FieldErrors, State};
