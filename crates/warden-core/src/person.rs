//! Persons — residents, workers, dependents, and supervisors.
//!
//! The person form is the only one with conditional fields. Changing the
//! category goes through [`apply_category_transition`], which clears every
//! field the new category does not use, so a stale employer or passcode can
//! never ride along into a submission.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
  Error, Result,
  category::{self, Category, ConditionalField, Requirement},
  entity::{
    Entity, input_optional_text, input_text, optional_text, optional_value,
    required_text, text_value,
  },
  patterns::{
    is_uuid_v4, is_valid_lag_id, is_valid_mobile, lag_id_for_editing,
    lag_id_to_storage,
  },
  record::{EntityKind, FieldSpec, FieldValue, Record, Schema},
  validation::ValidationErrors,
};

// ─── Schema ──────────────────────────────────────────────────────────────────

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const MOBILE: &str = "mobile";
pub const ADDRESS: &str = "address";
pub const CATEGORY: &str = "category";
pub const PASSCODE: &str = "passcode";
pub const RESIDENT_ID: &str = "residentId";
pub const EMPLOYER_ID: &str = "employerId";
pub const LAG_ID: &str = "lagId";

pub static SCHEMA: Schema = Schema {
  entity: EntityKind::Person,
  fields: &[
    FieldSpec::text(FIRST_NAME),
    FieldSpec::text(LAST_NAME),
    FieldSpec::text(MOBILE),
    FieldSpec::text(ADDRESS),
    FieldSpec::text(CATEGORY),
    FieldSpec::text(PASSCODE),
    FieldSpec::text(RESIDENT_ID),
    FieldSpec::text(EMPLOYER_ID),
    FieldSpec::text(LAG_ID),
  ],
};

/// Length of a supervisor (or optional resident) gate passcode.
pub const PASSCODE_LEN: usize = 4;

// ─── PersonRecord ────────────────────────────────────────────────────────────

/// The editable form of a person.
///
/// `lag_id` holds the digits a user edits; the `LAG` prefix is applied when
/// converting to a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonRecord {
  pub first_name:  String,
  pub last_name:   String,
  pub mobile:      String,
  pub address:     String,
  #[serde(deserialize_with = "category::deserialize_lenient")]
  pub category:    Option<Category>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub passcode:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resident_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub employer_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lag_id:      Option<String>,
}

impl PersonRecord {
  pub fn conditional(&self, field: ConditionalField) -> Option<&str> {
    match field {
      ConditionalField::Passcode => self.passcode.as_deref(),
      ConditionalField::ResidentId => self.resident_id.as_deref(),
      ConditionalField::EmployerId => self.employer_id.as_deref(),
    }
  }

  fn conditional_mut(&mut self, field: ConditionalField) -> &mut Option<String> {
    match field {
      ConditionalField::Passcode => &mut self.passcode,
      ConditionalField::ResidentId => &mut self.resident_id,
      ConditionalField::EmployerId => &mut self.employer_id,
    }
  }

  /// Method form of [`apply_category_transition`].
  pub fn transition(&self, new_category: Category) -> Self {
    apply_category_transition(self, new_category)
  }

  /// Trim text, drop blank optionals, and strip a typed `LAG` prefix.
  fn normalized(&self) -> Self {
    let trim_opt = |s: &Option<String>| {
      s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
    };
    Self {
      first_name:  self.first_name.trim().to_string(),
      last_name:   self.last_name.trim().to_string(),
      mobile:      self.mobile.trim().to_string(),
      address:     self.address.trim().to_string(),
      category:    self.category,
      passcode:    trim_opt(&self.passcode),
      resident_id: trim_opt(&self.resident_id),
      employer_id: trim_opt(&self.employer_id),
      lag_id:      self
        .lag_id
        .as_deref()
        .map(lag_id_for_editing)
        .filter(|s| !s.is_empty()),
    }
  }
}

// ─── Category transition ─────────────────────────────────────────────────────

/// Set the category and clear every conditional field it does not use.
///
/// Returns a new record; `candidate` is left untouched.
pub fn apply_category_transition(
  candidate: &PersonRecord,
  new_category: Category,
) -> PersonRecord {
  let mut next = candidate.clone();
  next.category = Some(new_category);
  for field in new_category.cleared_fields() {
    *next.conditional_mut(field) = None;
  }
  next
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Validate a person against the rules of its category.
///
/// Fields that do not apply to the current category are not examined.
pub fn validate(candidate: &PersonRecord) -> Result<PersonRecord, ValidationErrors> {
  let person = candidate.normalized();
  let mut errors = ValidationErrors::new();

  if person.first_name.is_empty() {
    errors.push(FIRST_NAME, "First name is required");
  }
  if person.last_name.is_empty() {
    errors.push(LAST_NAME, "Last name is required");
  }
  if person.mobile.is_empty() {
    errors.push(MOBILE, "Mobile number is required");
  } else if !is_valid_mobile(&person.mobile) {
    errors.push(
      MOBILE,
      "Enter an 11-digit mobile number starting with 070, 080, 081 or 090",
    );
  }
  if person.address.is_empty() {
    errors.push(ADDRESS, "Address is required");
  }

  match person.category {
    None => errors.push(CATEGORY, "Select a category"),
    Some(c) if !c.is_creatable() => {
      errors.push(CATEGORY, format!("{c} cannot be assigned from this form"));
    }
    Some(c) => {
      for field in ConditionalField::iter() {
        let value = person.conditional(field);
        match (c.requirement(field), value) {
          (Requirement::Required, None) => {
            errors.push(field.name(), missing_message(field));
          }
          (Requirement::Required | Requirement::Optional, Some(v)) => {
            if let Some(message) = shape_error(field, v) {
              errors.push(field.name(), message);
            }
          }
          _ => {}
        }
      }
    }
  }

  if let Some(lag_id) = &person.lag_id
    && !is_valid_lag_id(&lag_id_to_storage(lag_id))
  {
    errors.push(LAG_ID, "Lagos ID must be exactly 10 digits");
  }

  errors.into_result(person)
}

fn missing_message(field: ConditionalField) -> &'static str {
  match field {
    ConditionalField::Passcode => "Passcode is required for supervisors",
    ConditionalField::ResidentId => "Select the resident this dependent belongs to",
    ConditionalField::EmployerId => "Select the worker's employer",
  }
}

fn shape_error(field: ConditionalField, value: &str) -> Option<&'static str> {
  match field {
    ConditionalField::Passcode => (value.chars().count() != PASSCODE_LEN)
      .then_some("Passcode must be exactly 4 characters"),
    ConditionalField::ResidentId => {
      (!is_uuid_v4(value)).then_some("Resident reference is not a valid ID")
    }
    ConditionalField::EmployerId => {
      (!is_uuid_v4(value)).then_some("Employer reference is not a valid ID")
    }
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

impl Entity for PersonRecord {
  const SCHEMA: &'static Schema = &SCHEMA;
  /// The server never echoes a passcode, so the baseline is always blank.
  const FORCE_INCLUDE: &'static [&'static str] = &[PASSCODE];

  fn from_record(record: &Record) -> Self {
    Self {
      first_name:  required_text(record, FIRST_NAME),
      last_name:   required_text(record, LAST_NAME),
      mobile:      required_text(record, MOBILE),
      address:     required_text(record, ADDRESS),
      category:    record
        .text(CATEGORY)
        .and_then(|s| s.trim().parse().ok()),
      passcode:    optional_text(record, PASSCODE),
      resident_id: optional_text(record, RESIDENT_ID),
      employer_id: optional_text(record, EMPLOYER_ID),
      lag_id:      optional_text(record, LAG_ID)
        .map(|s| lag_id_for_editing(&s))
        .filter(|s| !s.is_empty()),
    }
  }

  fn to_record(&self) -> Record {
    let mut record = Record::new(&SCHEMA);
    record.put(FIRST_NAME, text_value(&self.first_name));
    record.put(LAST_NAME, text_value(&self.last_name));
    record.put(MOBILE, text_value(&self.mobile));
    record.put(ADDRESS, text_value(&self.address));
    record.put(
      CATEGORY,
      self.category.map(|c| FieldValue::Text(c.to_string())),
    );
    record.put(PASSCODE, optional_value(&self.passcode));
    record.put(RESIDENT_ID, optional_value(&self.resident_id));
    record.put(EMPLOYER_ID, optional_value(&self.employer_id));
    record.put(
      LAG_ID,
      self
        .lag_id
        .as_deref()
        .map(|s| FieldValue::Text(lag_id_to_storage(s))),
    );
    record
  }

  fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
    match field {
      FIRST_NAME => self.first_name = input_text(field, value)?,
      LAST_NAME => self.last_name = input_text(field, value)?,
      MOBILE => self.mobile = input_text(field, value)?,
      ADDRESS => self.address = input_text(field, value)?,
      CATEGORY => match input_optional_text(field, value)? {
        Some(tag) => {
          let category = tag
            .trim()
            .parse::<Category>()
            .map_err(|_| Error::UnknownCategory(tag.clone()))?;
          *self = apply_category_transition(self, category);
        }
        None => {
          self.category = None;
          for f in ConditionalField::iter() {
            *self.conditional_mut(f) = None;
          }
        }
      },
      PASSCODE => self.passcode = input_optional_text(field, value)?,
      RESIDENT_ID => self.resident_id = input_optional_text(field, value)?,
      EMPLOYER_ID => self.employer_id = input_optional_text(field, value)?,
      LAG_ID => self.lag_id = input_optional_text(field, value)?,
      _ => {
        return Err(Error::UnknownField {
          entity: EntityKind::Person,
          field:  field.to_string(),
        });
      }
    }
    Ok(())
  }

  fn validate(&self) -> Result<Self, ValidationErrors> { validate(self) }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;
  use strum::IntoEnumIterator;

  use super::*;

  const RESIDENT: &str = "9f1c2a4e-3b7d-4c1e-8a2f-6d5e4c3b2a19";
  const EMPLOYER: &str = "2b8e6f0a-1c3d-4e5f-9a7b-8c6d4e2f0a1b";

  fn base(category: Category) -> PersonRecord {
    PersonRecord {
      first_name: "Ada".into(),
      last_name: "Obi".into(),
      mobile: "08012345678".into(),
      address: "12 Admiralty Way".into(),
      category: Some(category),
      ..Default::default()
    }
  }

  fn loaded() -> PersonRecord {
    PersonRecord {
      passcode: Some("1234".into()),
      resident_id: Some(RESIDENT.into()),
      employer_id: Some(EMPLOYER.into()),
      ..base(Category::Resident)
    }
  }

  // ── Transition ──────────────────────────────────────────────────────────

  #[test]
  fn transition_clears_exactly_the_irrelevant_fields() {
    for category in Category::iter() {
      let next = apply_category_transition(&loaded(), category);
      assert_eq!(next.category, Some(category));
      for field in ConditionalField::iter() {
        let relevant = category.requirement(field).is_relevant();
        assert_eq!(
          next.conditional(field).is_some(),
          relevant,
          "{category}: {}",
          field.name()
        );
      }
    }
  }

  #[test]
  fn worker_to_dependent_drops_stale_employer() {
    let worker = PersonRecord {
      employer_id: Some("abc".into()),
      ..base(Category::Worker)
    };
    let dependent = apply_category_transition(&worker, Category::Dependent);
    assert_eq!(dependent.employer_id, None);
    assert_eq!(dependent.resident_id, None);

    // The resident reference is now required.
    let errors = validate(&dependent).unwrap_err();
    assert!(errors.has(RESIDENT_ID));
    assert!(!errors.has(EMPLOYER_ID));
  }

  #[test]
  fn transition_is_idempotent_and_pure() {
    let original = loaded();
    for category in Category::iter() {
      let once = apply_category_transition(&original, category);
      let twice = apply_category_transition(&once, category);
      assert_eq!(once, twice, "{category}");
    }
    assert_eq!(original, loaded());
  }

  // ── Validation ──────────────────────────────────────────────────────────

  #[test]
  fn supervisor_requires_passcode() {
    let errors = validate(&base(Category::Supervisor)).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].field, PASSCODE);

    let short = PersonRecord {
      passcode: Some("12".into()),
      ..base(Category::Supervisor)
    };
    assert!(validate(&short).unwrap_err().has(PASSCODE));

    let ok = PersonRecord {
      passcode: Some("4821".into()),
      ..base(Category::Supervisor)
    };
    assert!(validate(&ok).is_ok());

    let blank = PersonRecord {
      passcode: Some("    ".into()),
      ..base(Category::Supervisor)
    };
    let errors = validate(&blank).unwrap_err();
    assert_eq!(errors.message_for(PASSCODE), Some("Passcode is required for supervisors"));
  }

  #[test]
  fn resident_passcode_is_optional_but_checked() {
    assert!(validate(&base(Category::Resident)).is_ok());
    let bad = PersonRecord {
      passcode: Some("12345".into()),
      ..base(Category::Resident)
    };
    assert!(validate(&bad).unwrap_err().has(PASSCODE));
  }

  #[test]
  fn dependent_with_blank_resident_fails_on_resident_id() {
    let person = PersonRecord {
      first_name: "A".into(),
      last_name: "B".into(),
      mobile: "08012345678".into(),
      address: "X".into(),
      category: Some(Category::Dependent),
      resident_id: Some(String::new()),
      ..Default::default()
    };
    let errors = validate(&person).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].field, RESIDENT_ID);
  }

  #[test]
  fn worker_employer_must_be_uuid_v4() {
    let bad = PersonRecord {
      employer_id: Some("abc".into()),
      ..base(Category::Worker)
    };
    assert!(validate(&bad).unwrap_err().has(EMPLOYER_ID));

    let good = PersonRecord {
      employer_id: Some(EMPLOYER.into()),
      ..base(Category::Worker)
    };
    assert!(validate(&good).is_ok());
  }

  #[test]
  fn lag_id_needs_ten_digits() {
    let short = PersonRecord {
      lag_id: Some("12345".into()),
      ..base(Category::Resident)
    };
    let errors = validate(&short).unwrap_err();
    assert_eq!(errors.errors()[0].field, LAG_ID);

    let good = PersonRecord {
      lag_id: Some(" LAG0123456789 ".into()),
      ..base(Category::Resident)
    };
    let normalized = validate(&good).unwrap();
    assert_eq!(normalized.lag_id.as_deref(), Some("0123456789"));

    let blank = PersonRecord {
      lag_id: Some("   ".into()),
      ..base(Category::Resident)
    };
    assert_eq!(validate(&blank).unwrap().lag_id, None);
  }

  #[test]
  fn always_required_fields_each_get_an_error() {
    let errors = validate(&PersonRecord::default()).unwrap_err();
    for field in [FIRST_NAME, LAST_NAME, MOBILE, ADDRESS, CATEGORY] {
      assert!(errors.has(field), "missing error for {field}");
    }
  }

  #[test]
  fn bad_mobile_and_artisan_rejected() {
    let person = PersonRecord {
      mobile: "0911234567".into(),
      ..base(Category::Artisan)
    };
    let errors = validate(&person).unwrap_err();
    assert!(errors.has(MOBILE));
    assert!(errors.has(CATEGORY));
  }

  #[test]
  fn stale_inapplicable_fields_are_not_reported() {
    let person = PersonRecord {
      passcode: Some("x".into()),
      employer_id: Some("not-an-id".into()),
      ..base(Category::Dependent)
    };
    let errors = validate(&person).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has(RESIDENT_ID));
  }

  #[test]
  fn validation_trims_text() {
    let person = PersonRecord {
      first_name: "  Ada ".into(),
      ..base(Category::Resident)
    };
    assert_eq!(validate(&person).unwrap().first_name, "Ada");
  }

  // ── Entity ──────────────────────────────────────────────────────────────

  #[test]
  fn record_round_trip_applies_lag_prefix() {
    let person = PersonRecord {
      lag_id: Some("0123456789".into()),
      ..base(Category::Resident)
    };
    let record = person.to_record();
    assert_eq!(record.text(LAG_ID), Some("LAG0123456789"));
    assert_eq!(record.text(CATEGORY), Some("RESIDENT"));
    assert_eq!(record.get(PASSCODE), None);
    assert_eq!(PersonRecord::from_record(&record), person);
  }

  #[test]
  fn from_json_normalises_server_shape() {
    let person = PersonRecord::from_json(&json!({
      "id": "ignored",
      "firstName": "Ada",
      "lastName": "Obi",
      "mobile": "08012345678",
      "address": "12 Admiralty Way",
      "category": "WORKER",
      "employerId": EMPLOYER,
      "residentId": null,
      "lagId": ""
    }))
    .unwrap();
    assert_eq!(person.category, Some(Category::Worker));
    assert_eq!(person.employer_id.as_deref(), Some(EMPLOYER));
    assert_eq!(person.resident_id, None);
    assert_eq!(person.lag_id, None);
  }

  #[test]
  fn set_field_routes_category_through_transition() {
    let mut person = loaded();
    person.set_field(CATEGORY, "SUPERVISOR".into()).unwrap();
    assert_eq!(person.category, Some(Category::Supervisor));
    assert_eq!(person.passcode.as_deref(), Some("1234"));
    assert_eq!(person.resident_id, None);
    assert_eq!(person.employer_id, None);

    assert!(matches!(
      person.set_field(CATEGORY, "LANDLORD".into()),
      Err(Error::UnknownCategory(_))
    ));
    assert!(matches!(
      person.set_field("nickname", "Ada".into()),
      Err(Error::UnknownField { .. })
    ));

    person.set_field(CATEGORY, FieldValue::Null).unwrap();
    assert_eq!(person.category, None);
    assert_eq!(person.passcode, None);
  }

  #[test]
  fn unknown_category_deserialises_to_none() {
    let person: PersonRecord =
      serde_json::from_value(json!({ "firstName": "Ada", "category": "LANDLORD" }))
        .unwrap();
    assert_eq!(person.category, None);
    assert!(validate(&person).unwrap_err().has(CATEGORY));
  }
}
