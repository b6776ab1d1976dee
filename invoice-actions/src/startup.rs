use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::actions::{AuthActions, InvoiceActions};
use crate::config::Settings;
use crate::handlers;
use crate::services::{HttpCredentialVerifier, ListingCache, PgInvoiceRepository};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/login", post(handlers::auth::login_handler))
        .route(
            "/dashboard/invoices",
            get(handlers::invoices::list_invoices),
        )
        .route(
            "/dashboard/invoices/create",
            post(handlers::invoices::create_invoice),
        )
        .route(
            "/dashboard/invoices/:id/edit",
            post(handlers::invoices::update_invoice),
        )
        .route(
            "/dashboard/invoices/:id/delete",
            post(handlers::invoices::delete_invoice),
        )
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    addr: SocketAddr,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let database = PgInvoiceRepository::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await?;

        if settings.database.run_migrations {
            database.run_migrations().await?;
        }

        let database = Arc::new(database);
        let listing = Arc::new(ListingCache::new());
        let verifier = Arc::new(HttpCredentialVerifier::new(settings.auth_provider.clone()));
        tracing::info!(auth_provider = %verifier.base_url(), "Credential verifier configured");

        let state = AppState {
            invoices: Arc::new(InvoiceActions::new(
                database.clone(),
                listing.clone(),
                settings.application.listing_path.clone(),
            )),
            auth: Arc::new(AuthActions::new(
                verifier,
                settings.auth_provider.strategy.clone(),
            )),
            repository: database.clone(),
            listing,
            database: Some(database),
        };

        let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

        Ok(Self {
            addr,
            router: build_router(state),
        })
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", self.addr, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", self.addr, e)
        })?;

        tracing::info!("Listening on {}", self.addr);
        axum::serve(listener, self.router).await?;

        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}
