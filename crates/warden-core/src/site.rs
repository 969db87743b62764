//! Sites — gated locations managed under a contractor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  entity::{
    Entity, input_optional_text, input_text, optional_text, optional_value,
    required_text, text_value,
  },
  patterns::is_uuid_v4,
  record::{EntityKind, FieldKind, FieldSpec, FieldValue, Record, Schema},
  validation::ValidationErrors,
};

pub const NAME: &str = "name";
pub const ADDRESS: &str = "address";
pub const CONTRACTOR_ID: &str = "contractorId";
pub const CAPACITY: &str = "capacity";
pub const OPENED_ON: &str = "openedOn";

pub static SCHEMA: Schema = Schema {
  entity: EntityKind::Site,
  fields: &[
    FieldSpec::text(NAME),
    FieldSpec::text(ADDRESS),
    FieldSpec::text(CONTRACTOR_ID),
    FieldSpec::number(CAPACITY),
    FieldSpec::date(OPENED_ON),
  ],
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteRecord {
  pub name:          String,
  pub address:       String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contractor_id: Option<String>,
  /// Maximum number of people admitted at once.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub capacity:      Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub opened_on:     Option<NaiveDate>,
}

pub fn validate(candidate: &SiteRecord) -> Result<SiteRecord, ValidationErrors> {
  let site = SiteRecord {
    name:          candidate.name.trim().to_string(),
    address:       candidate.address.trim().to_string(),
    contractor_id: candidate
      .contractor_id
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string),
    capacity:      candidate.capacity,
    opened_on:     candidate.opened_on,
  };
  let mut errors = ValidationErrors::new();

  if site.name.is_empty() {
    errors.push(NAME, "Site name is required");
  }
  if site.address.is_empty() {
    errors.push(ADDRESS, "Address is required");
  }
  if let Some(id) = &site.contractor_id
    && !is_uuid_v4(id)
  {
    errors.push(CONTRACTOR_ID, "Contractor reference is not a valid ID");
  }
  if let Some(capacity) = site.capacity
    && !(capacity >= 1.0 && capacity.fract() == 0.0)
  {
    errors.push(CAPACITY, "Capacity must be a positive whole number");
  }

  errors.into_result(site)
}

impl Entity for SiteRecord {
  const SCHEMA: &'static Schema = &SCHEMA;

  fn from_record(record: &Record) -> Self {
    Self {
      name:          required_text(record, NAME),
      address:       required_text(record, ADDRESS),
      contractor_id: optional_text(record, CONTRACTOR_ID),
      capacity:      record.get(CAPACITY).and_then(FieldValue::as_number),
      opened_on:     record.get(OPENED_ON).and_then(FieldValue::as_date),
    }
  }

  fn to_record(&self) -> Record {
    let mut record = Record::new(&SCHEMA);
    record.put(NAME, text_value(&self.name));
    record.put(ADDRESS, text_value(&self.address));
    record.put(CONTRACTOR_ID, optional_value(&self.contractor_id));
    record.put(CAPACITY, self.capacity.map(FieldValue::Number));
    record.put(OPENED_ON, self.opened_on.map(FieldValue::Date));
    record
  }

  fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
    let mismatch = |expected| Error::TypeMismatch {
      field: field.to_string(),
      expected,
    };
    match (field, value) {
      (NAME, value) => self.name = input_text(field, value)?,
      (ADDRESS, value) => self.address = input_text(field, value)?,
      (CONTRACTOR_ID, value) => {
        self.contractor_id = input_optional_text(field, value)?;
      }
      (CAPACITY, FieldValue::Null) => self.capacity = None,
      (CAPACITY, FieldValue::Number(n)) => self.capacity = Some(n),
      (CAPACITY, _) => return Err(mismatch(FieldKind::Number)),
      (OPENED_ON, FieldValue::Null) => self.opened_on = None,
      (OPENED_ON, FieldValue::Date(d)) => self.opened_on = Some(d),
      (OPENED_ON, _) => return Err(mismatch(FieldKind::Date)),
      _ => {
        return Err(Error::UnknownField {
          entity: EntityKind::Site,
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
  use super::*;

  fn gate() -> SiteRecord {
    SiteRecord {
      name: "North Gate".into(),
      address: "Admiralty Way".into(),
      ..Default::default()
    }
  }

  #[test]
  fn capacity_must_be_positive_whole_number() {
    for bad in [0.0, -3.0, 2.5, f64::NAN] {
      let site = SiteRecord {
        capacity: Some(bad),
        ..gate()
      };
      assert!(validate(&site).unwrap_err().has(CAPACITY), "{bad}");
    }
    let site = SiteRecord {
      capacity: Some(40.0),
      ..gate()
    };
    assert!(validate(&site).is_ok());
  }

  #[test]
  fn contractor_reference_shape() {
    let site = SiteRecord {
      contractor_id: Some("acme".into()),
      ..gate()
    };
    assert!(validate(&site).unwrap_err().has(CONTRACTOR_ID));
  }

  #[test]
  fn record_round_trip() {
    let site = SiteRecord {
      capacity: Some(12.0),
      opened_on: NaiveDate::from_ymd_opt(2021, 3, 4),
      ..gate()
    };
    assert_eq!(SiteRecord::from_record(&site.to_record()), site);
  }

  #[test]
  fn set_field_by_kind() {
    let mut site = gate();
    let day = NaiveDate::from_ymd_opt(2022, 8, 1).unwrap();
    site.set_field(OPENED_ON, day.into()).unwrap();
    site.set_field(CAPACITY, 25.0.into()).unwrap();
    assert_eq!(site.opened_on, Some(day));
    assert_eq!(site.capacity, Some(25.0));

    assert!(matches!(
      site.set_field(CAPACITY, "25".into()),
      Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
      site.set_field("gates", 2.0.into()),
      Err(Error::UnknownField { .. })
    ));
  }
}
