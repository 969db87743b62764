//! Partial-update payloads: baseline record + candidate record → minimal PATCH.
//!
//! Comparison is strict. `""`, `null`, and an undefined field are three
//! different values, so a field that moves between them is reported.

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

use crate::record::{EntityKind, FieldValue, Record};

/// The changed fields of one entity, in schema order.
///
/// A field whose candidate value is undefined is kept with `None` and
/// serialised as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
  entity:  EntityKind,
  entries: Vec<(&'static str, Option<FieldValue>)>,
}

impl Patch {
  pub fn entity(&self) -> EntityKind { self.entity }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn contains(&self, field: &str) -> bool {
    self.entries.iter().any(|(name, _)| *name == field)
  }

  /// `None` if the field is not in the patch; `Some(None)` if it is, with an
  /// undefined value.
  pub fn get(&self, field: &str) -> Option<Option<&FieldValue>> {
    self
      .entries
      .iter()
      .find(|(name, _)| *name == field)
      .map(|(_, v)| v.as_ref())
  }

  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.entries.iter().map(|(name, _)| *name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&FieldValue>)> {
    self.entries.iter().map(|(name, v)| (*name, v.as_ref()))
  }

  pub fn to_json(&self) -> Value {
    let object: Map<String, Value> = self
      .iter()
      .map(|(name, v)| {
        (name.to_string(), v.map(FieldValue::to_json).unwrap_or(Value::Null))
      })
      .collect();
    Value::Object(object)
  }
}

impl Serialize for Patch {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (name, value) in &self.entries {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

/// Compute the minimal set of changed fields between `original` and
/// `candidate`.
///
/// A field is included when its candidate value differs from the original,
/// or when it is named in `force_include` and its candidate value is
/// non-empty. Both records must share a schema; `force_include` must name
/// fields of that schema.
pub fn compute_diff(
  original: &Record,
  candidate: &Record,
  force_include: &[&str],
) -> Patch {
  let schema = original.schema();
  debug_assert_eq!(
    schema,
    candidate.schema(),
    "diffing records of different schemas"
  );
  debug_assert!(
    force_include.iter().all(|k| schema.position(k).is_some()),
    "force_include names a field outside the {} schema",
    schema.entity
  );

  let entries = schema
    .names()
    .enumerate()
    .filter_map(|(index, name)| {
      let before = original.slot(index);
      let after = candidate.slot(index);
      let forced = force_include.contains(&name) && after.is_some_and(|v| !v.is_empty());
      (before != after || forced).then(|| (name, after.cloned()))
    })
    .collect();

  Patch {
    entity: schema.entity,
    entries,
  }
}

/// What a caller should do with a patch. An empty patch is never sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
  Send(Patch),
  NothingToSubmit,
}

impl From<Patch> for Submission {
  fn from(patch: Patch) -> Self {
    if patch.is_empty() {
      Self::NothingToSubmit
    } else {
      Self::Send(patch)
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
