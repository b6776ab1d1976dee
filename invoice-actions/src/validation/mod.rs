//! Invoice form schema.
//!
//! Each field has one rule, a pure function from the raw transported value to
//! a typed value or a [`ValidationError`]. [`validate_invoice_form`] runs every
//! rule and collects all failures, so a submission with three bad fields gets
//! three messages back.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use std::str::FromStr;
use validator::{ValidationError, ValidationErrors};

use crate::models::{FormFields, InvoiceStatus};

/// Form field names as submitted by the invoice form.
pub mod fields {
    pub const CUSTOMER_ID: &str = "customerId";
    pub const AMOUNT: &str = "amount";
    pub const STATUS: &str = "status";
}

pub const CUSTOMER_MESSAGE: &str = "Please select a customer";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status";

/// Validated invoice form.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn customer_id_rule(raw: Option<&str>) -> Result<String, ValidationError> {
    match raw {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(rule_error("invalid_type", CUSTOMER_MESSAGE)),
    }
}

/// Coerce a transported amount to a number.
///
/// Absent and blank values coerce to zero. Plain and scientific notation are
/// accepted; anything else is not a number.
pub fn coerce_amount(raw: Option<&str>) -> Option<Decimal> {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Minor units for a positive amount, rounded half away from zero.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// A positive amount in minor units.
pub fn amount_rule(raw: Option<&str>) -> Result<i64, ValidationError> {
    let value = coerce_amount(raw).ok_or_else(|| rule_error("invalid_number", AMOUNT_MESSAGE))?;

    if value <= Decimal::ZERO {
        return Err(rule_error("too_small", AMOUNT_MESSAGE));
    }

    to_cents(value).ok_or_else(|| rule_error("out_of_range", AMOUNT_MESSAGE))
}

pub fn status_rule(raw: Option<&str>) -> Result<InvoiceStatus, ValidationError> {
    raw.and_then(InvoiceStatus::parse)
        .ok_or_else(|| rule_error("invalid_enum", STATUS_MESSAGE))
}

/// Validate the `customerId`, `amount` and `status` fields of an invoice form.
///
/// `id` and `date` are never read from the form.
pub fn validate_invoice_form(form: &FormFields) -> Result<InvoiceInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let customer_id = customer_id_rule(form.get(fields::CUSTOMER_ID))
        .map_err(|e| errors.add(fields::CUSTOMER_ID, e))
        .ok();
    let amount_in_cents = amount_rule(form.get(fields::AMOUNT))
        .map_err(|e| errors.add(fields::AMOUNT, e))
        .ok();
    let status = status_rule(form.get(fields::STATUS))
        .map_err(|e| errors.add(fields::STATUS, e))
        .ok();

    match (customer_id, amount_in_cents, status) {
        (Some(customer_id), Some(amount_in_cents), Some(status)) => Ok(InvoiceInput {
            customer_id,
            amount_in_cents,
            status,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldErrors;

    fn form(customer: &str, amount: &str, status: &str) -> FormFields {
        FormFields::new()
            .with(fields::CUSTOMER_ID, customer)
            .with(fields::AMOUNT, amount)
            .with(fields::STATUS, status)
    }

    #[test]
    fn accepts_valid_form() {
        let input = validate_invoice_form(&form("abc", "125.50", "paid")).unwrap();

        assert_eq!(input.customer_id, "abc");
        assert_eq!(input.amount_in_cents, 12550);
        assert_eq!(input.status, InvoiceStatus::Paid);
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = validate_invoice_form(&FormFields::new()).unwrap_err();
        let flat = FieldErrors::from(&errors);

        assert_eq!(flat.customer_id, Some(vec![CUSTOMER_MESSAGE.to_string()]));
        assert_eq!(flat.amount, Some(vec![AMOUNT_MESSAGE.to_string()]));
        assert_eq!(flat.status, Some(vec![STATUS_MESSAGE.to_string()]));
    }

    #[test]
    fn empty_customer_is_rejected() {
        assert!(customer_id_rule(Some("")).is_err());
        assert!(customer_id_rule(None).is_err());
    }

    #[test]
    fn non_numeric_amount_has_distinct_code() {
        let err = amount_rule(Some("twelve")).unwrap_err();
        assert_eq!(err.code, "invalid_number");
        assert_eq!(err.message.as_deref(), Some(AMOUNT_MESSAGE));

        let err = amount_rule(Some("0")).unwrap_err();
        assert_eq!(err.code, "too_small");

        assert_eq!(amount_rule(Some("19.99")), Ok(1999));
    }

    #[test]
    fn amount_coercion_follows_numeric_strings() {
        assert_eq!(coerce_amount(None), Some(Decimal::ZERO));
        assert_eq!(coerce_amount(Some("  ")), Some(Decimal::ZERO));
        assert_eq!(coerce_amount(Some(" 12.5 ")), Some(Decimal::new(125, 1)));
        assert_eq!(coerce_amount(Some("1e3")), Some(Decimal::new(1000, 0)));
        assert_eq!(coerce_amount(Some("1_000")), None);
        assert_eq!(coerce_amount(Some("0x10")), None);
    }

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(to_cents(Decimal::from_str("0.125").unwrap()), Some(13));
        assert_eq!(to_cents(Decimal::from_str("19.99").unwrap()), Some(1999));
        assert_eq!(to_cents(Decimal::from_str("0.001").unwrap()), Some(0));
    }

    #[test]
    fn amount_beyond_i64_cents_is_rejected() {
        let err = amount_rule(Some("100000000000000000000")).unwrap_err();
        assert_eq!(err.code, "out_of_range");
    }

    #[test]
    fn status_is_exact() {
        assert_eq!(status_rule(Some("pending")), Ok(InvoiceStatus::Pending));
        assert!(status_rule(Some("Paid")).is_err());
        assert!(status_rule(Some("")).is_err());
        assert!(status_rule(None).is_err());
    }
}
