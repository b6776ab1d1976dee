pub mod auth;
pub mod health;
pub mod invoices;
pub mod metrics;

pub use health::health_check;
pub use self::metrics::metrics;
