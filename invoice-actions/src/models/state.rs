//! The shape handed back to a submitting form.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::validation::fields;

/// Per-field messages for the invoice form, in the order rules report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let by_field = errors.field_errors();
        let messages = |field: &str| {
            by_field.get(field).map(|errs| {
                errs.iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
            })
        };

        Self {
            customer_id: messages(fields::CUSTOMER_ID),
            amount: messages(fields::AMOUNT),
            status: messages(fields::STATUS),
        }
    }
}

/// Result of a form action.
///
/// `errors` set means the input was rejected field by field; `message` alone
/// means the input was fine but the datastore call failed (or, for delete,
/// that it succeeded).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl State {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn rejected(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }
}

/// How a mutation finished: with data for the form, or by navigating away.
///
/// `Redirect` is terminal; nothing runs after a handler produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Respond(State),
    Redirect(String),
}

impl ActionOutcome {
    pub fn state(&self) -> Option<&State> {
        match self {
            ActionOutcome::Respond(state) => Some(state),
            ActionOutcome::Redirect(_) => None,
        }
    }
}
