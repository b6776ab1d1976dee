//! Invoice model for invoice-actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
        }
    }

    /// Parse the exact wire value; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(InvoiceStatus::Paid),
            "pending" => Some(InvoiceStatus::Pending),
            _ => None,
        }
    }
}

/// Invoice row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Minor units (cents).
    pub amount: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Input for inserting an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Columns rewritten by an update; `date` is create-time only.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
}
