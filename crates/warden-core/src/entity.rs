//! The [`Entity`] trait — a typed projection of a schema-bound [`Record`].
//!
//! Implemented by [`ContractorRecord`](crate::contractor::ContractorRecord),
//! [`PersonRecord`](crate::person::PersonRecord), and
//! [`SiteRecord`](crate::site::SiteRecord). Edit sessions, the preflight API,
//! and the CLI are generic over this trait.

use crate::{
  Result,
  record::{FieldValue, Record, Schema},
  validation::ValidationErrors,
};

pub trait Entity: Clone + Sized {
  const SCHEMA: &'static Schema;

  /// Fields sent on every submission while non-empty, even when equal to the
  /// baseline. Used for write-only values the server never echoes back.
  const FORCE_INCLUDE: &'static [&'static str] = &[];

  /// Project a record into the typed form. Missing, `null`, and blank
  /// optional values all become "absent".
  fn from_record(record: &Record) -> Self;

  fn to_record(&self) -> Record;

  /// Assign one field from a form input.
  fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()>;

  /// Check every rule; on success return the normalised value.
  fn validate(&self) -> Result<Self, ValidationErrors>;

  /// Decode a server record straight into the typed form.
  fn from_json(value: &serde_json::Value) -> Result<Self> {
    Record::from_json(Self::SCHEMA, value).map(|r| Self::from_record(&r))
  }
}

// ─── Conversion helpers shared by the implementors ───────────────────────────

/// Trimmed text, or `None` when missing, `null`, or blank.
pub(crate) fn optional_text(record: &Record, name: &str) -> Option<String> {
  record
    .text(name)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

/// Trimmed text, or the empty string when missing or `null`.
pub(crate) fn required_text(record: &Record, name: &str) -> String {
  record.text(name).unwrap_or_default().trim().to_string()
}

pub(crate) fn text_value(s: &str) -> Option<FieldValue> {
  Some(FieldValue::Text(s.to_string()))
}

pub(crate) fn optional_value(s: &Option<String>) -> Option<FieldValue> {
  s.as_deref().map(|s| FieldValue::Text(s.to_string()))
}

/// Interpret a form input as optional text. `null` and `""` clear the field.
pub(crate) fn input_optional_text(
  field: &str,
  value: FieldValue,
) -> Result<Option<String>> {
  match value {
    FieldValue::Null => Ok(None),
    FieldValue::Text(s) if s.is_empty() => Ok(None),
    FieldValue::Text(s) => Ok(Some(s)),
    _ => Err(text_mismatch(field)),
  }
}

/// Interpret a form input as required text. `null` becomes `""`.
pub(crate) fn input_text(field: &str, value: FieldValue) -> Result<String> {
  match value {
    FieldValue::Null => Ok(String::new()),
    FieldValue::Text(s) => Ok(s),
    _ => Err(text_mismatch(field)),
  }
}

fn text_mismatch(field: &str) -> crate::Error {
  crate::Error::TypeMismatch {
    field:    field.to_string(),
    expected: crate::record::FieldKind::Text,
  }
}
