//! Field-scoped validation results.
//!
//! Validators never fail fast: they collect one [`FieldError`] per offending
//! field so a form can attach every message to its own input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A message bound to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// One or more field errors. Never constructed empty by the validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} field(s) failed validation", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.push(FieldError {
      field:   field.to_string(),
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn errors(&self) -> &[FieldError] { &self.0 }

  /// The first message reported for `field`, if any.
  pub fn message_for(&self, field: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message.as_str())
  }

  pub fn has(&self, field: &str) -> bool { self.message_for(field).is_some() }

  /// `Ok(value)` when nothing was collected.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl IntoIterator for ValidationErrors {
  type Item = FieldError;
  type IntoIter = std::vec::IntoIter<FieldError>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

/// The serialisable outcome of a validation run:
/// `{"valid":true,"value":…}` or `{"valid":false,"errors":[…]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport<T> {
  pub valid:  bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value:  Option<T>,
  #[serde(skip_serializing_if = "ValidationErrors::is_empty")]
  pub errors: ValidationErrors,
}

impl<T> From<Result<T, ValidationErrors>> for ValidationReport<T> {
  fn from(result: Result<T, ValidationErrors>) -> Self {
    match result {
      Ok(value) => Self {
        valid:  true,
        value:  Some(value),
        errors: ValidationErrors::new(),
      },
      Err(errors) => Self {
        valid: false,
        value: None,
        errors,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn report_shapes() {
    let ok: ValidationReport<u8> = Ok(7).into();
    assert_eq!(
      serde_json::to_value(&ok).unwrap(),
      json!({ "valid": true, "value": 7 })
    );

    let mut errors = ValidationErrors::new();
    errors.push("passcode", "Passcode is required");
    let bad: ValidationReport<u8> = Err(errors).into();
    assert_eq!(
      serde_json::to_value(&bad).unwrap(),
      json!({
        "valid": false,
        "errors": [{ "field": "passcode", "message": "Passcode is required" }]
      })
    );
  }

  #[test]
  fn lookup_by_field() {
    let mut errors = ValidationErrors::new();
    errors.push("mobile", "first");
    errors.push("mobile", "second");
    assert_eq!(errors.message_for("mobile"), Some("first"));
    assert!(!errors.has("address"));
    assert_eq!(errors.len(), 2);
    assert!(errors.into_result(()).is_err());
  }
}
