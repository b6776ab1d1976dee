use serde::Deserialize;
use std::collections::HashMap;

/// String-keyed fields of a submitted form.
///
/// Values are kept exactly as transported; absent keys stay absent so the
/// validator can tell "missing" from "empty".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}
