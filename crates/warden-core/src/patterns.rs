//! Syntactic checks shared by the entity validators.

use std::sync::OnceLock;

use regex::Regex;
use uuid::{Uuid, Variant, Version};

/// Storage prefix of a Lagos resident ID. Users edit only the digits.
pub const LAG_ID_PREFIX: &str = "LAG";

fn mobile_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^0(70|80|81|90)[0-9]{8}$").expect("mobile pattern"))
}

fn lag_id_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^LAG[0-9]{10}$").expect("lag id pattern"))
}

fn email_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

/// A local mobile number: `070`, `080`, `081`, or `090` followed by 8 digits.
pub fn is_valid_mobile(s: &str) -> bool { mobile_re().is_match(s) }

/// A stored Lagos ID: the prefix followed by exactly 10 digits.
pub fn is_valid_lag_id(stored: &str) -> bool { lag_id_re().is_match(stored) }

pub fn is_valid_email(s: &str) -> bool { email_re().is_match(s) }

/// Hyphenated, version 4, RFC 4122 variant.
pub fn is_uuid_v4(s: &str) -> bool {
  s.len() == 36
    && Uuid::try_parse(s).is_ok_and(|u| {
      u.get_version() == Some(Version::Random) && u.get_variant() == Variant::RFC4122
    })
}

/// Turn an edited Lagos ID into its stored form. Input that already carries
/// the prefix (any case) is accepted as-is.
pub fn lag_id_to_storage(edited: &str) -> String {
  let trimmed = edited.trim();
  match strip_lag_prefix(trimmed) {
    Some(body) => format!("{LAG_ID_PREFIX}{body}"),
    None => format!("{LAG_ID_PREFIX}{trimmed}"),
  }
}

/// Turn a stored Lagos ID into the digits a user edits.
pub fn lag_id_for_editing(stored: &str) -> String {
  let trimmed = stored.trim();
  strip_lag_prefix(trimmed).unwrap_or(trimmed).to_string()
}

fn strip_lag_prefix(s: &str) -> Option<&str> {
  let head = s.get(..LAG_ID_PREFIX.len())?;
  head
    .eq_ignore_ascii_case(LAG_ID_PREFIX)
    .then(|| &s[LAG_ID_PREFIX.len()..])
}
