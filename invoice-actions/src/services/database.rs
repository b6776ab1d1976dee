//! Invoice persistence.

use async_trait::async_trait;
use metrics::histogram;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::models::{Invoice, InvoiceChanges, NewInvoice};

/// The statements the invoice actions issue. Each call is one statement.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<u64, AppError>;

    /// Returns rows affected; zero means no invoice had that id.
    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, AppError>;

    /// Returns rows affected; zero means no invoice had that id.
    async fn delete_invoice(&self, id: &str) -> Result<u64, AppError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;
}

/// Run a query and record its duration, whether it succeeded or not.
async fn timed<T, E>(
    query: &'static str,
    statement: impl Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let started = Instant::now();
    let result = statement.await;
    histogram!("db_query_duration_seconds", "query" => query)
        .record(started.elapsed().as_secs_f64());
    result
}

/// Postgres-backed invoice repository.
#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-actions"))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<u64, AppError> {
        let statement = sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2::uuid, $3, $4, $5)
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount_in_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool);

        let result = timed("insert_invoice", statement)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert invoice: {}", e)))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, changes))]
    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, AppError> {
        let statement = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4::uuid
            "#,
        )
        .bind(&changes.customer_id)
        .bind(changes.amount_in_cents)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(&self.pool);

        let result = timed("update_invoice", statement)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_invoice(&self, id: &str) -> Result<u64, AppError> {
        let statement = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool);

        let result = timed("delete_invoice", statement)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e)))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let statement = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id
            "#,
        )
        .fetch_all(&self.pool);

        timed("list_invoices", statement)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))
    }
}
