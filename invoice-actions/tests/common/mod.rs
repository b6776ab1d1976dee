//! Common test utilities for invoice-actions integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use invoice_actions::actions::{AuthActions, InvoiceActions};
use invoice_actions::models::{FormFields, Invoice, InvoiceChanges, NewInvoice};
use invoice_actions::services::{
    AuthError, AuthErrorKind, CredentialVerifier, InvoiceRepository, ListingCache, SignInError,
    SignedIn, ViewCache,
};
use invoice_actions::AppState;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

pub const LISTING_PATH: &str = "/dashboard/invoices";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,invoice_actions=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn invoice_form(customer_id: &str, amount: &str, status: &str) -> FormFields {
    FormFields::new()
        .with("customerId", customer_id)
        .with("amount", amount)
        .with("status", status)
}

/// In-process datastore double that records every statement it receives.
pub struct RecordingRepository {
    pub inserted: Mutex<Vec<NewInvoice>>,
    pub updated: Mutex<Vec<(String, InvoiceChanges)>>,
    pub deleted: Mutex<Vec<String>>,
    pub stored: Mutex<Vec<Invoice>>,
    pub list_calls: AtomicU64,
    fail: AtomicBool,
    rows_affected: AtomicU64,
}

impl RecordingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inserted: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            stored: Mutex::new(Vec::new()),
            list_calls: AtomicU64::new(0),
            fail: AtomicBool::new(false),
            rows_affected: AtomicU64::new(1),
        })
    }

    pub fn failing() -> Arc<Self> {
        let repo = Self::new();
        repo.fail.store(true, Ordering::SeqCst);
        repo
    }

    pub fn set_rows_affected(&self, rows: u64) {
        self.rows_affected.store(rows, Ordering::SeqCst);
    }

    fn outcome(&self, statement: &str) -> Result<u64, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "{}: connection refused",
                statement
            )));
        }
        Ok(self.rows_affected.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl InvoiceRepository for RecordingRepository {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<u64, AppError> {
        let rows = self.outcome("insert")?;
        self.inserted.lock().unwrap().push(invoice.clone());
        Ok(rows)
    }

    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, AppError> {
        let rows = self.outcome("update")?;
        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), changes.clone()));
        Ok(rows)
    }

    async fn delete_invoice(&self, id: &str) -> Result<u64, AppError> {
        let rows = self.outcome("delete")?;
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(rows)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome("select")?;
        Ok(self.stored.lock().unwrap().clone())
    }
}

/// View cache double that remembers which paths were invalidated.
#[derive(Default)]
pub struct RecordingCache {
    pub invalidated: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn invalidations(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

impl ViewCache for RecordingCache {
    fn invalidate(&self, path: &str) {
        self.invalidated.lock().unwrap().push(path.to_string());
    }
}

/// How the stub verifier answers every sign-in.
#[derive(Clone)]
pub enum Verdict {
    Accept,
    Reject(AuthErrorKind),
    Crash(&'static str),
}

pub struct StubVerifier {
    verdict: Verdict,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl StubVerifier {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CredentialVerifier for StubVerifier {
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &FormFields,
    ) -> Result<SignedIn, SignInError> {
        self.calls.lock().unwrap().push((
            strategy.to_string(),
            credentials.get("email").map(str::to_string),
        ));

        match &self.verdict {
            Verdict::Accept => Ok(SignedIn {
                access_token: "access-token".to_string(),
                refresh_token: Some("refresh-token".to_string()),
            }),
            Verdict::Reject(kind) => Err(AuthError::new(kind.clone(), "stub rejection").into()),
            Verdict::Crash(msg) => Err(SignInError::Unexpected(anyhow::anyhow!(*msg))),
        }
    }
}

pub fn actions_with(
    repository: Arc<RecordingRepository>,
    cache: Arc<RecordingCache>,
) -> InvoiceActions {
    init_tracing();
    InvoiceActions::new(repository, cache, LISTING_PATH)
}

pub fn auth_actions(verifier: Arc<StubVerifier>) -> AuthActions {
    init_tracing();
    AuthActions::new(verifier, "credentials")
}

/// Application state wired to in-process doubles and a real listing cache.
pub fn test_state(repository: Arc<RecordingRepository>, verdict: Verdict) -> AppState {
    init_tracing();
    let listing = Arc::new(ListingCache::new());

    AppState {
        invoices: Arc::new(InvoiceActions::new(
            repository.clone(),
            listing.clone(),
            LISTING_PATH,
        )),
        auth: Arc::new(AuthActions::new(StubVerifier::new(verdict), "credentials")),
        repository,
        listing,
        database: None,
    }
}
