//! Display formatting for amounts, counts, and dates.
//!
//! Formatting takes an explicit [`FormatConfig`]; there is no process-wide
//! "current locale".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
pub enum Locale {
  #[default]
  #[strum(serialize = "en-NG")]
  #[serde(rename = "en-NG")]
  EnNg,
  #[strum(serialize = "en-US")]
  #[serde(rename = "en-US")]
  EnUs,
  #[strum(serialize = "fr-FR")]
  #[serde(rename = "fr-FR")]
  FrFr,
}

impl Locale {
  fn group_separator(self) -> &'static str {
    match self {
      Self::EnNg | Self::EnUs => ",",
      // Narrow no-break space.
      Self::FrFr => "\u{202f}",
    }
  }

  fn decimal_separator(self) -> &'static str {
    match self {
      Self::EnNg | Self::EnUs => ".",
      Self::FrFr => ",",
    }
  }

  fn date_pattern(self) -> &'static str {
    match self {
      Self::EnNg | Self::FrFr => "%d/%m/%Y",
      Self::EnUs => "%m/%d/%Y",
    }
  }

  fn symbol_after_amount(self) -> bool { matches!(self, Self::FrFr) }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
  #[default]
  Ngn,
  Usd,
  Gbp,
  Eur,
}

impl Currency {
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Ngn => "₦",
      Self::Usd => "$",
      Self::Gbp => "£",
      Self::Eur => "€",
    }
  }
}

/// Locale and currency for every formatting call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
  pub locale:   Locale,
  pub currency: Currency,
}

impl FormatConfig {
  pub fn new(locale: Locale, currency: Currency) -> Self { Self { locale, currency } }

  /// An integer with locale digit grouping, e.g. `12,500`.
  pub fn number(&self, n: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{sign}{}", group(n.unsigned_abs(), self.locale.group_separator()))
  }

  /// A monetary amount given in minor units (kobo, cents).
  pub fn money(&self, minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let body = format!(
      "{}{}{:02}",
      group(abs / 100, self.locale.group_separator()),
      self.locale.decimal_separator(),
      abs % 100
    );
    let symbol = self.currency.symbol();
    if self.locale.symbol_after_amount() {
      format!("{sign}{body}\u{a0}{symbol}")
    } else {
      format!("{sign}{symbol}{body}")
    }
  }

  pub fn date(&self, date: NaiveDate) -> String {
    date.format(self.locale.date_pattern()).to_string()
  }
}

fn group(n: u64, separator: &str) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push_str(separator);
    }
    out.push(c);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn naira_by_default() {
    let cfg = FormatConfig::default();
    assert_eq!(cfg.money(123_450), "₦1,234.50");
    assert_eq!(cfg.money(5), "₦0.05");
    assert_eq!(cfg.money(-500), "-₦5.00");
    assert_eq!(cfg.number(12_500), "12,500");
    assert_eq!(cfg.number(999), "999");
  }

  #[test]
  fn french_euro_puts_symbol_last() {
    let cfg = FormatConfig::new(Locale::FrFr, Currency::Eur);
    assert_eq!(cfg.money(123_456_789), "1\u{202f}234\u{202f}567,89\u{a0}€");
  }

  #[test]
  fn dates_follow_locale() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(FormatConfig::default().date(day), "29/02/2024");
    assert_eq!(
      FormatConfig::new(Locale::EnUs, Currency::Usd).date(day),
      "02/29/2024"
    );
  }

  #[test]
  fn config_deserialises_with_defaults() {
    let cfg: FormatConfig = serde_json::from_str(r#"{ "locale": "en-US" }"#).unwrap();
    assert_eq!(cfg.locale, Locale::EnUs);
    assert_eq!(cfg.currency, Currency::Ngn);
    assert_eq!("fr-FR".parse::<Locale>().unwrap(), Locale::FrFr);
  }
}
