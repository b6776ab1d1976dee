pub mod actions;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod validation;

use actions::{AuthActions, InvoiceActions};
use services::{InvoiceRepository, ListingCache, PgInvoiceRepository};
use std::sync::Arc;

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<InvoiceActions>,
    pub auth: Arc<AuthActions>,
    pub repository: Arc<dyn InvoiceRepository>,
    pub listing: Arc<ListingCache>,
    /// Present when backed by Postgres; used by the health check.
    pub database: Option<Arc<PgInvoiceRepository>>,
}
