//! Error types for `warden-core`.
//!
//! These cover structural problems with records (wrong entity, unknown field,
//! mistyped value). Invalid user input is not an error in this sense; it is
//! reported as [`crate::validation::ValidationErrors`].

use thiserror::Error;

use crate::record::{EntityKind, FieldKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown field {field:?} for {entity}")]
  UnknownField { entity: EntityKind, field: String },

  #[error("field {field:?} expects a {expected} value")]
  TypeMismatch { field: String, expected: FieldKind },

  #[error("expected a JSON object for {0}")]
  NotAnObject(EntityKind),

  #[error("expected a {expected} record, got {found}")]
  EntityMismatch {
    expected: EntityKind,
    found:    EntityKind,
  },

  #[error("invalid date in {field:?}: {value}")]
  InvalidDate { field: String, value: String },

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
