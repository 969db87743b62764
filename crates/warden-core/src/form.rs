//! Edit sessions — one entity being edited against a server baseline.
//!
//! A session keeps the baseline [`Record`], the live candidate, the set of
//! fields the user has touched, and the latest advisory validation result.
//! Submission re-validates and diffs; an empty diff is reported as
//! [`Submission::NothingToSubmit`] and must not be sent.

use std::collections::BTreeSet;

use crate::{
  Error, Result,
  diff::{Submission, compute_diff},
  entity::Entity,
  record::{FieldValue, Record},
  validation::{FieldError, ValidationErrors},
};

/// The form-facing state of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState<'a> {
  pub name:    &'static str,
  /// The candidate value, `None` when undefined.
  pub value:   Option<FieldValue>,
  /// Only reported once the field has been touched.
  pub error:   Option<&'a str>,
  pub touched: bool,
}

#[derive(Debug, Clone)]
pub struct EditSession<E: Entity> {
  baseline:  Record,
  candidate: E,
  touched:   BTreeSet<&'static str>,
  live:      ValidationErrors,
}

impl<E: Entity> EditSession<E> {
  /// Start editing a record fetched from the server.
  pub fn new(server: &Record) -> Result<Self> {
    if server.entity() != E::SCHEMA.entity {
      return Err(Error::EntityMismatch {
        expected: E::SCHEMA.entity,
        found:    server.entity(),
      });
    }
    Ok(Self::from_entity(E::from_record(server)))
  }

  /// Start editing from an already-projected baseline.
  pub fn from_entity(baseline: E) -> Self {
    let live = baseline.validate().err().unwrap_or_default();
    Self {
      baseline: baseline.to_record(),
      candidate: baseline,
      touched: BTreeSet::new(),
      live,
    }
  }

  /// The baseline, normalised through the same projection as the candidate
  /// so untouched fields never show up as changes.
  pub fn baseline(&self) -> &Record { &self.baseline }

  pub fn candidate(&self) -> &E { &self.candidate }

  /// Assign one field, mark it touched, and refresh live validation.
  pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
    let name = E::SCHEMA.resolve(field)?;
    self.candidate.set_field(name, value.into())?;
    self.touched.insert(name);
    self.revalidate();
    Ok(())
  }

  /// Replace the whole candidate, marking every field touched.
  pub fn replace_candidate(&mut self, candidate: E) {
    self.candidate = candidate;
    self.touched.extend(E::SCHEMA.names());
    self.revalidate();
  }

  pub fn field(&self, name: &str) -> Option<FieldState<'_>> {
    let name = E::SCHEMA.resolve(name).ok()?;
    let touched = self.touched.contains(name);
    Some(FieldState {
      name,
      value: self.candidate.to_record().get(name).cloned(),
      error: touched.then(|| self.live.message_for(name)).flatten(),
      touched,
    })
  }

  /// Every advisory error, touched or not.
  pub fn errors(&self) -> &[FieldError] { self.live.errors() }

  pub fn is_touched(&self, name: &str) -> bool { self.touched.contains(name) }

  /// Whether the candidate differs from the baseline at all.
  pub fn is_dirty(&self) -> bool {
    !compute_diff(&self.baseline, &self.candidate.to_record(), &[]).is_empty()
  }

  /// Validate authoritatively and reduce the candidate to a patch.
  pub fn submit(&self) -> Result<Submission, ValidationErrors> {
    let validated = self.candidate.validate()?;
    let patch = compute_diff(&self.baseline, &validated.to_record(), E::FORCE_INCLUDE);
    Ok(Submission::from(patch))
  }

  /// Install a freshly fetched baseline after a successful submission.
  pub fn rebase(&mut self, fresh: &Record) -> Result<()> {
    *self = Self::new(fresh)?;
    Ok(())
  }

  fn revalidate(&mut self) {
    self.live = self.candidate.validate().err().unwrap_or_default();
  }
}
