//! Entity-generic command bodies, kept free of I/O so they can be tested
//! directly. `main` reads files, prints, and talks to the network.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::Value;
use warden_core::{
  category::Category,
  contractor::ContractorRecord,
  diff::{Patch, Submission},
  entity::Entity,
  form::EditSession,
  format::FormatConfig,
  person::{PersonRecord, apply_category_transition},
  record::{EntityKind, FieldValue, Record},
  site::SiteRecord,
  validation::{ValidationErrors, ValidationReport},
};

/// What a validate-and-diff run concluded.
#[derive(Debug)]
pub enum Outcome {
  Invalid(ValidationErrors),
  NothingToSubmit,
  Patch(Patch),
}

// ─── Validate ─────────────────────────────────────────────────────────────────

/// Validate a JSON record; a passing report carries the normalised record.
pub fn validate(kind: EntityKind, value: &Value) -> Result<ValidationReport<Value>> {
  match kind {
    EntityKind::Contractor => validate_as::<ContractorRecord>(value),
    EntityKind::Person => validate_as::<PersonRecord>(value),
    EntityKind::Site => validate_as::<SiteRecord>(value),
  }
}

fn validate_as<E: Entity>(value: &Value) -> Result<ValidationReport<Value>> {
  let entity = E::from_json(value).context("record does not match the schema")?;
  let result = entity.validate().map(|valid| valid.to_record().to_json());
  Ok(result.into())
}

// ─── Transition ───────────────────────────────────────────────────────────────

pub fn transition(value: &Value, category: &str) -> Result<Value> {
  let category: Category = category
    .trim()
    .parse()
    .map_err(|_| anyhow!("unknown category {category:?}"))?;
  let person = PersonRecord::from_json(value).context("input is not a person")?;
  let next = apply_category_transition(&person, category);
  serde_json::to_value(next).context("serialising person")
}

// ─── Diff ─────────────────────────────────────────────────────────────────────

/// Validate `candidate` and diff it against the server copy `original`.
pub fn preflight(kind: EntityKind, original: &Value, candidate: &Value) -> Result<Outcome> {
  match kind {
    EntityKind::Contractor => preflight_as::<ContractorRecord>(original, candidate),
    EntityKind::Person => preflight_as::<PersonRecord>(original, candidate),
    EntityKind::Site => preflight_as::<SiteRecord>(original, candidate),
  }
}

fn preflight_as<E: Entity>(original: &Value, candidate: &Value) -> Result<Outcome> {
  let original =
    Record::from_json(E::SCHEMA, original).context("original does not match the schema")?;
  let mut session = EditSession::<E>::new(&original)?;
  session.replace_candidate(
    E::from_json(candidate).context("candidate does not match the schema")?,
  );
  Ok(match session.submit() {
    Err(errors) => Outcome::Invalid(errors),
    Ok(Submission::NothingToSubmit) => Outcome::NothingToSubmit,
    Ok(Submission::Send(patch)) => Outcome::Patch(patch),
  })
}

/// One `field: value` line per patch entry, formatted for display.
pub fn summarize(format: &FormatConfig, patch: &Patch) -> Vec<String> {
  patch
    .iter()
    .map(|(field, value)| format!("{field}: {}", render(format, value)))
    .collect()
}

fn render(format: &FormatConfig, value: Option<&FieldValue>) -> String {
  match value {
    None | Some(FieldValue::Null) => "(cleared)".to_string(),
    Some(FieldValue::Text(s)) => s.clone(),
    Some(FieldValue::Bool(b)) => if *b { "yes" } else { "no" }.to_string(),
    Some(FieldValue::Number(n)) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
      format.number(*n as i64)
    }
    Some(FieldValue::Number(n)) => n.to_string(),
    Some(FieldValue::Date(d)) => format.date(*d),
  }
}

// ─── Format ───────────────────────────────────────────────────────────────────

/// A standalone value to render with the configured locale and currency.
#[derive(Subcommand, Debug, Clone)]
pub enum FormatValue {
  /// An amount in minor units (kobo, cents).
  Money {
    #[arg(allow_negative_numbers = true)]
    minor_units: i64,
  },
  Number {
    #[arg(allow_negative_numbers = true)]
    value: i64,
  },
  /// A calendar date, `YYYY-MM-DD`.
  Date { date: NaiveDate },
}

pub fn format_value(format: &FormatConfig, value: &FormatValue) -> String {
  match value {
    FormatValue::Money { minor_units } => format.money(*minor_units),
    FormatValue::Number { value } => format.number(*value),
    FormatValue::Date { date } => format.date(*date),
  }
}
