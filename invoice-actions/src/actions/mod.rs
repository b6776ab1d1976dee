//! Form actions: the entry points a submitted form invokes.

pub mod auth;
pub mod invoices;

pub use auth::{AuthActions, AuthOutcome};
pub use invoices::InvoiceActions;
