//! Person categories and the conditional fields each one uses.
//!
//! Three person fields only make sense for particular categories. The table
//! in [`Category::requirement`] is the single source of truth for both
//! clearing (on a category change) and validation.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The discriminant tag on a person.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
  Resident,
  Worker,
  Dependent,
  Supervisor,
  /// Exists in the wider domain but cannot be created from the person form.
  Artisan,
}

/// A person field whose relevance depends on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionalField {
  Passcode,
  ResidentId,
  EmployerId,
}

impl ConditionalField {
  /// Wire name of the field.
  pub fn name(self) -> &'static str {
    match self {
      Self::Passcode => "passcode",
      Self::ResidentId => "residentId",
      Self::EmployerId => "employerId",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
  Required,
  /// Shown and validated when filled in, but may be left blank.
  Optional,
  /// Hidden; any value is cleared on a category change.
  NotApplicable,
}

impl Requirement {
  pub fn is_relevant(self) -> bool { self != Self::NotApplicable }
}

impl Category {
  /// Categories selectable when creating or editing a person.
  pub const CREATABLE: [Category; 4] = [
    Category::Resident,
    Category::Worker,
    Category::Dependent,
    Category::Supervisor,
  ];

  pub fn is_creatable(self) -> bool { Self::CREATABLE.contains(&self) }

  pub fn requirement(self, field: ConditionalField) -> Requirement {
    use Category::*;
    use ConditionalField::*;
    match (field, self) {
      (Passcode, Supervisor) => Requirement::Required,
      (Passcode, Resident) => Requirement::Optional,
      (ResidentId, Dependent) => Requirement::Required,
      (EmployerId, Worker) => Requirement::Required,
      _ => Requirement::NotApplicable,
    }
  }

  /// Conditional fields that are visible for this category.
  pub fn relevant_fields(self) -> impl Iterator<Item = ConditionalField> {
    ConditionalField::iter().filter(move |f| self.requirement(*f).is_relevant())
  }

  /// Conditional fields that must be empty for this category.
  pub fn cleared_fields(self) -> impl Iterator<Item = ConditionalField> {
    ConditionalField::iter().filter(move |f| !self.requirement(*f).is_relevant())
  }
}

/// Deserialise an optional category, mapping unknown tags to `None` so an
/// unrecognised value surfaces as a field error instead of a decode failure.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(deserializer)?;
  Ok(raw.and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn at_most_one_conditional_field_per_category() {
    for category in Category::iter() {
      let relevant: Vec<_> = category.relevant_fields().collect();
      assert!(relevant.len() <= 1, "{category}: {relevant:?}");
    }
  }

  #[test]
  fn relevance_table() {
    let relevant = |c: Category| c.relevant_fields().collect::<Vec<_>>();
    assert_eq!(relevant(Category::Supervisor), [ConditionalField::Passcode]);
    assert_eq!(relevant(Category::Resident), [ConditionalField::Passcode]);
    assert_eq!(relevant(Category::Dependent), [ConditionalField::ResidentId]);
    assert_eq!(relevant(Category::Worker), [ConditionalField::EmployerId]);
    assert!(relevant(Category::Artisan).is_empty());

    assert_eq!(
      Category::Resident.requirement(ConditionalField::Passcode),
      Requirement::Optional
    );
    assert_eq!(
      Category::Supervisor.requirement(ConditionalField::Passcode),
      Requirement::Required
    );
  }

  #[test]
  fn cleared_is_complement_of_relevant() {
    for category in Category::iter() {
      let mut all: Vec<_> = category
        .relevant_fields()
        .chain(category.cleared_fields())
        .collect();
      all.sort_by_key(|f| f.name());
      assert_eq!(all.len(), 3, "{category}");
    }
  }

  #[test]
  fn artisan_is_not_creatable() {
    assert!(!Category::Artisan.is_creatable());
    assert!(Category::CREATABLE.iter().all(|c| c.is_creatable()));
  }

  #[test]
  fn parse_and_display() {
    assert_eq!("SUPERVISOR".parse::<Category>().unwrap(), Category::Supervisor);
    assert_eq!("worker".parse::<Category>().unwrap(), Category::Worker);
    assert_eq!(Category::Dependent.to_string(), "DEPENDENT");
    assert!("LANDLORD".parse::<Category>().is_err());
  }
}
