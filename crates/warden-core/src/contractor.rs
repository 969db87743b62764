//! Contractors — companies that place workers on estate sites.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  entity::{
    Entity, input_optional_text, input_text, optional_text, optional_value,
    required_text, text_value,
  },
  patterns::{is_valid_email, is_valid_mobile},
  record::{EntityKind, FieldKind, FieldSpec, FieldValue, Record, Schema},
  validation::ValidationErrors,
};

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const ADDRESS: &str = "address";
pub const CONTACT_PERSON: &str = "contactPerson";
pub const IS_ACTIVE: &str = "isActive";

pub static SCHEMA: Schema = Schema {
  entity: EntityKind::Contractor,
  fields: &[
    FieldSpec::text(NAME),
    FieldSpec::text(EMAIL),
    FieldSpec::text(PHONE),
    FieldSpec::text(ADDRESS),
    FieldSpec::text(CONTACT_PERSON),
    FieldSpec::boolean(IS_ACTIVE),
  ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractorRecord {
  pub name:           String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:          Option<String>,
  pub phone:          String,
  pub address:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_person: Option<String>,
  pub is_active:      bool,
}

impl Default for ContractorRecord {
  fn default() -> Self {
    Self {
      name:           String::new(),
      email:          None,
      phone:          String::new(),
      address:        String::new(),
      contact_person: None,
      is_active:      true,
    }
  }
}

pub fn validate(
  candidate: &ContractorRecord,
) -> Result<ContractorRecord, ValidationErrors> {
  let contractor = ContractorRecord {
    name:           candidate.name.trim().to_string(),
    email:          trimmed(&candidate.email),
    phone:          candidate.phone.trim().to_string(),
    address:        candidate.address.trim().to_string(),
    contact_person: trimmed(&candidate.contact_person),
    is_active:      candidate.is_active,
  };
  let mut errors = ValidationErrors::new();

  if contractor.name.is_empty() {
    errors.push(NAME, "Company name is required");
  }
  if contractor.phone.is_empty() {
    errors.push(PHONE, "Phone number is required");
  } else if !is_valid_mobile(&contractor.phone) {
    errors.push(
      PHONE,
      "Enter an 11-digit phone number starting with 070, 080, 081 or 090",
    );
  }
  if contractor.address.is_empty() {
    errors.push(ADDRESS, "Address is required");
  }
  if let Some(email) = &contractor.email
    && !is_valid_email(email)
  {
    errors.push(EMAIL, "Enter a valid email address");
  }

  errors.into_result(contractor)
}

fn trimmed(s: &Option<String>) -> Option<String> {
  s.as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

impl Entity for ContractorRecord {
  const SCHEMA: &'static Schema = &SCHEMA;

  fn from_record(record: &Record) -> Self {
    Self {
      name:           required_text(record, NAME),
      email:          optional_text(record, EMAIL),
      phone:          required_text(record, PHONE),
      address:        required_text(record, ADDRESS),
      contact_person: optional_text(record, CONTACT_PERSON),
      is_active:      record
        .get(IS_ACTIVE)
        .and_then(FieldValue::as_bool)
        .unwrap_or(true),
    }
  }

  fn to_record(&self) -> Record {
    let mut record = Record::new(&SCHEMA);
    record.put(NAME, text_value(&self.name));
    record.put(EMAIL, optional_value(&self.email));
    record.put(PHONE, text_value(&self.phone));
    record.put(ADDRESS, text_value(&self.address));
    record.put(CONTACT_PERSON, optional_value(&self.contact_person));
    record.put(IS_ACTIVE, Some(FieldValue::Bool(self.is_active)));
    record
  }

  fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
    match field {
      NAME => self.name = input_text(field, value)?,
      EMAIL => self.email = input_optional_text(field, value)?,
      PHONE => self.phone = input_text(field, value)?,
      ADDRESS => self.address = input_text(field, value)?,
      CONTACT_PERSON => self.contact_person = input_optional_text(field, value)?,
      IS_ACTIVE => {
        self.is_active = value.as_bool().ok_or_else(|| Error::TypeMismatch {
          field:    field.to_string(),
          expected: FieldKind::Boolean,
        })?;
      }
      _ => {
        return Err(Error::UnknownField {
          entity: EntityKind::Contractor,
          field:  field.to_string(),
        });
      }
    }
    Ok(())
  }

  fn validate(&self) -> Result<Self, ValidationErrors> { validate(self) }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn acme() -> ContractorRecord {
    ContractorRecord {
      name: "Acme".into(),
      phone: "08000000000".into(),
      address: "1 Marina".into(),
      ..Default::default()
    }
  }

  #[test]
  fn valid_contractor_is_normalised() {
    let candidate = ContractorRecord {
      name: " Acme ".into(),
      email: Some("  ".into()),
      ..acme()
    };
    let value = validate(&candidate).unwrap();
    assert_eq!(value.name, "Acme");
    assert_eq!(value.email, None);
  }

  #[test]
  fn reports_each_bad_field() {
    let candidate = ContractorRecord {
      name: String::new(),
      email: Some("nope".into()),
      phone: "0800".into(),
      ..acme()
    };
    let errors = validate(&candidate).unwrap_err();
    assert!(errors.has(NAME));
    assert!(errors.has(EMAIL));
    assert!(errors.has(PHONE));
    assert!(!errors.has(ADDRESS));
  }

  #[test]
  fn active_flag_defaults_to_true() {
    let contractor =
      ContractorRecord::from_json(&json!({ "name": "Acme", "isActive": null }))
        .unwrap();
    assert!(contractor.is_active);

    let inactive =
      ContractorRecord::from_json(&json!({ "name": "Acme", "isActive": false }))
        .unwrap();
    assert!(!inactive.is_active);
  }

  #[test]
  fn set_field_checks_types() {
    let mut contractor = acme();
    contractor.set_field(IS_ACTIVE, false.into()).unwrap();
    assert!(!contractor.is_active);
    assert!(contractor.set_field(IS_ACTIVE, "no".into()).is_err());
    contractor.set_field(EMAIL, "".into()).unwrap();
    assert_eq!(contractor.email, None);
  }
}
