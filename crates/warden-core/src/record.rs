//! Records — flat, schema-bound snapshots of a contractor, person, or site.
//!
//! A [`Record`] is what the remote API serves and what a PATCH body is
//! computed from. Each record is bound to a static [`Schema`], so two records
//! of the same entity always expose the same ordered key set. A slot holding
//! `None` is an *undefined* field; `Some(FieldValue::Null)` is an explicit
//! `null`. The two are never conflated.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::{Error, Result};

// ─── Entity and field kinds ──────────────────────────────────────────────────

/// The entity types that have a details edit view.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Contractor,
  Person,
  Site,
}

impl EntityKind {
  /// The REST collection segment for this entity, e.g. `"persons"`.
  pub fn collection(self) -> &'static str {
    match self {
      Self::Contractor => "contractors",
      Self::Person => "persons",
      Self::Site => "sites",
    }
  }
}

/// The value type a schema field accepts (besides `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
  Text,
  Number,
  Boolean,
  Date,
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
  /// Wire name, as served by the remote API (camelCase).
  pub name: &'static str,
  pub kind: FieldKind,
}

impl FieldSpec {
  pub const fn text(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Text }
  }

  pub const fn number(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Number }
  }

  pub const fn boolean(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Boolean }
  }

  pub const fn date(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Date }
  }
}

/// The fixed, ordered field set of one entity type.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
  pub entity: EntityKind,
  pub fields: &'static [FieldSpec],
}

impl Schema {
  pub fn position(&self, name: &str) -> Option<usize> {
    self.fields.iter().position(|f| f.name == name)
  }

  pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
    let fields: &'static [FieldSpec] = self.fields;
    fields.iter().find(|f| f.name == name)
  }

  /// Field names in canonical order.
  pub fn names(&self) -> impl Iterator<Item = &'static str> {
    let fields: &'static [FieldSpec] = self.fields;
    fields.iter().map(|f| f.name)
  }

  /// Resolve `name` to its static spelling, or fail with
  /// [`Error::UnknownField`].
  pub fn resolve(&self, name: &str) -> Result<&'static str> {
    self.field(name).map(|f| f.name).ok_or_else(|| Error::UnknownField {
      entity: self.entity,
      field:  name.to_string(),
    })
  }

  fn require(&self, name: &str) -> Result<(usize, &'static FieldSpec)> {
    let fields: &'static [FieldSpec] = self.fields;
    fields
      .iter()
      .enumerate()
      .find(|(_, f)| f.name == name)
      .ok_or_else(|| Error::UnknownField {
        entity: self.entity,
        field:  name.to_string(),
      })
  }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A single defined field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
  Null,
  Bool(bool),
  Number(f64),
  Text(String),
  Date(NaiveDate),
}

impl FieldValue {
  /// `null` and the empty string are empty; every boolean, number, and date
  /// counts as a value.
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Null => true,
      Self::Text(s) => s.is_empty(),
      Self::Bool(_) | Self::Number(_) | Self::Date(_) => false,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_date(&self) -> Option<NaiveDate> {
    match self {
      Self::Date(d) => Some(*d),
      _ => None,
    }
  }

  /// Whether this value may be stored in a field of `kind`. `null` fits
  /// every kind.
  pub fn fits(&self, kind: FieldKind) -> bool {
    matches!(
      (self, kind),
      (Self::Null, _)
        | (Self::Bool(_), FieldKind::Boolean)
        | (Self::Number(_), FieldKind::Number)
        | (Self::Text(_), FieldKind::Text)
        | (Self::Date(_), FieldKind::Date)
    )
  }

  /// Decode a JSON value according to the field's declared kind.
  pub fn from_json(spec: &FieldSpec, value: &Value) -> Result<Self> {
    let mismatch = || Error::TypeMismatch {
      field:    spec.name.to_string(),
      expected: spec.kind,
    };
    match (spec.kind, value) {
      (_, Value::Null) => Ok(Self::Null),
      (FieldKind::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
      (FieldKind::Number, Value::Number(n)) => {
        n.as_f64().map(Self::Number).ok_or_else(mismatch)
      }
      (FieldKind::Boolean, Value::Bool(b)) => Ok(Self::Bool(*b)),
      (FieldKind::Date, Value::String(s)) => parse_date(spec.name, s).map(Self::Date),
      _ => Err(mismatch()),
    }
  }

  pub fn to_json(&self) -> Value {
    match self {
      Self::Null => Value::Null,
      Self::Bool(b) => Value::Bool(*b),
      Self::Number(n) => serde_json::Number::from_f64(*n)
        .map(Value::Number)
        .unwrap_or(Value::Null),
      Self::Text(s) => Value::String(s.clone()),
      Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
    }
  }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<bool> for FieldValue {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<f64> for FieldValue {
  fn from(n: f64) -> Self { Self::Number(n) }
}

impl From<NaiveDate> for FieldValue {
  fn from(d: NaiveDate) -> Self { Self::Date(d) }
}

/// Accepts a bare `YYYY-MM-DD` date or an RFC 3339 timestamp, keeping only
/// the calendar date of the latter.
fn parse_date(field: &str, s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
    .map_err(|_| Error::InvalidDate {
      field: field.to_string(),
      value: s.to_string(),
    })
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An ordered, schema-bound mapping from field name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
  schema: &'static Schema,
  values: Vec<Option<FieldValue>>,
}

impl Record {
  /// A record with every field undefined.
  pub fn new(schema: &'static Schema) -> Self {
    Self {
      schema,
      values: vec![None; schema.fields.len()],
    }
  }

  pub fn schema(&self) -> &'static Schema { self.schema }

  pub fn entity(&self) -> EntityKind { self.schema.entity }

  /// The defined value of `name`, or `None` if undefined or not in the schema.
  pub fn get(&self, name: &str) -> Option<&FieldValue> {
    self
      .schema
      .position(name)
      .and_then(|i| self.values[i].as_ref())
  }

  pub fn text(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(FieldValue::as_text)
  }

  /// Define `name`. Fails if the field is unknown or `value` does not fit
  /// its kind.
  pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
    let (index, spec) = self.schema.require(name)?;
    let value = value.into();
    if !value.fits(spec.kind) {
      return Err(Error::TypeMismatch {
        field:    spec.name.to_string(),
        expected: spec.kind,
      });
    }
    self.values[index] = Some(value);
    Ok(())
  }

  /// Make `name` undefined.
  pub fn unset(&mut self, name: &str) -> Result<()> {
    let (index, _) = self.schema.require(name)?;
    self.values[index] = None;
    Ok(())
  }

  /// Builder form of [`Record::set`].
  pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self> {
    self.set(name, value)?;
    Ok(self)
  }

  /// Every schema field in canonical order, with its value if defined.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&FieldValue>)> {
    self.schema.names().zip(self.values.iter().map(Option::as_ref))
  }

  /// Slot access by schema position.
  pub(crate) fn slot(&self, index: usize) -> Option<&FieldValue> {
    self.values.get(index).and_then(Option::as_ref)
  }

  /// Store a value produced by a typed projection. Names come from the
  /// entity's own constants, so an unknown name is a programming error.
  pub(crate) fn put(&mut self, name: &'static str, value: Option<FieldValue>) {
    match self.schema.position(name) {
      Some(index) => self.values[index] = value,
      None => debug_assert!(false, "{name} is not a {} field", self.entity()),
    }
  }

  /// Decode a server JSON object. Keys outside the schema (ids, timestamps)
  /// are ignored; keys inside it must carry a value of the right kind.
  pub fn from_json(schema: &'static Schema, value: &Value) -> Result<Self> {
    let object = value.as_object().ok_or(Error::NotAnObject(schema.entity))?;
    let mut record = Self::new(schema);
    for (index, spec) in schema.fields.iter().enumerate() {
      if let Some(v) = object.get(spec.name) {
        record.values[index] = Some(FieldValue::from_json(spec, v)?);
      }
    }
    Ok(record)
  }

  /// Encode as a JSON object; undefined fields are omitted.
  pub fn to_json(&self) -> Value {
    let object: Map<String, Value> = self
      .iter()
      .filter_map(|(name, v)| v.map(|v| (name.to_string(), v.to_json())))
      .collect();
    Value::Object(object)
  }
}

impl Serialize for Record {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let defined = self.values.iter().filter(|v| v.is_some()).count();
    let mut map = serializer.serialize_map(Some(defined))?;
    for (name, value) in self.iter() {
      if let Some(value) = value {
        map.serialize_entry(name, value)?;
      }
    }
    map.end()
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::site;

  #[test]
  fn from_json_ignores_keys_outside_schema() {
    let record = Record::from_json(
      &site::SCHEMA,
      &json!({ "id": "abc", "name": "North Gate", "createdAt": "2024-01-01" }),
    )
    .unwrap();
    assert_eq!(record.text("name"), Some("North Gate"));
    assert_eq!(record.get("id"), None);
    assert_eq!(record.get("address"), None);
  }

  #[test]
  fn from_json_rejects_mistyped_field() {
    let err =
      Record::from_json(&site::SCHEMA, &json!({ "capacity": "lots" })).unwrap_err();
    assert!(
      matches!(err, Error::TypeMismatch { ref field, expected: FieldKind::Number } if field == "capacity"),
      "unexpected error: {err}"
    );
  }

  #[test]
  fn from_json_rejects_non_object() {
    let err = Record::from_json(&site::SCHEMA, &json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::NotAnObject(EntityKind::Site)));
  }

  #[test]
  fn dates_accept_plain_and_rfc3339() {
    let plain =
      Record::from_json(&site::SCHEMA, &json!({ "openedOn": "2023-05-17" })).unwrap();
    let stamped = Record::from_json(
      &site::SCHEMA,
      &json!({ "openedOn": "2023-05-17T09:30:00Z" }),
    )
    .unwrap();
    let expected = NaiveDate::from_ymd_opt(2023, 5, 17).unwrap();
    assert_eq!(plain.get("openedOn"), Some(&FieldValue::Date(expected)));
    assert_eq!(stamped.get("openedOn"), Some(&FieldValue::Date(expected)));

    let err =
      Record::from_json(&site::SCHEMA, &json!({ "openedOn": "yesterday" })).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { .. }));
  }

  #[test]
  fn null_and_undefined_stay_distinct() {
    let record =
      Record::from_json(&site::SCHEMA, &json!({ "contractorId": null })).unwrap();
    assert_eq!(record.get("contractorId"), Some(&FieldValue::Null));
    assert_eq!(record.get("address"), None);

    let encoded = record.to_json();
    assert_eq!(encoded, json!({ "contractorId": null }));
  }

  #[test]
  fn set_checks_name_and_kind() {
    let mut record = Record::new(&site::SCHEMA);
    record.set("capacity", 40.0).unwrap();
    assert_eq!(record.get("capacity"), Some(&FieldValue::Number(40.0)));

    assert!(matches!(
      record.set("colour", "blue"),
      Err(Error::UnknownField { .. })
    ));
    assert!(matches!(
      record.set("capacity", "forty"),
      Err(Error::TypeMismatch { .. })
    ));

    record.unset("capacity").unwrap();
    assert_eq!(record.get("capacity"), None);
  }

  #[test]
  fn iter_follows_schema_order() {
    let record = Record::new(&site::SCHEMA)
      .with("openedOn", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
      .unwrap()
      .with("name", "Ikoyi")
      .unwrap();
    let names: Vec<_> = record.iter().map(|(n, _)| n).collect();
    assert_eq!(names, site::SCHEMA.names().collect::<Vec<_>>());
  }

  #[test]
  fn serialize_matches_to_json() {
    let record = Record::new(&site::SCHEMA)
      .with("name", "Lekki Phase 1")
      .unwrap()
      .with("capacity", 120.0)
      .unwrap();
    assert_eq!(serde_json::to_value(&record).unwrap(), record.to_json());
  }
}
