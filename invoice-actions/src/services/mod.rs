//! Collaborators of the invoice actions.

pub mod credentials;
pub mod database;
pub mod listing_cache;
pub mod metrics;

pub use credentials::{
    AuthError, AuthErrorKind, CredentialVerifier, HttpCredentialVerifier, SignInError, SignedIn,
};
pub use database::{InvoiceRepository, PgInvoiceRepository};
pub use listing_cache::{ListingCache, ViewCache};
pub use self::metrics::{get_metrics, init_metrics};
