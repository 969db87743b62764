//! Layered settings: defaults, then an optional TOML file, then `WARDEN_*`
//! environment variables (`__` separates nested keys, e.g.
//! `WARDEN_API__BASE_URL`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use warden_core::format::FormatConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub api:    ApiSettings,
  pub server: ServerSettings,
  pub format: FormatConfig,
}

/// The remote record API the `submit` command talks to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
  pub base_url: String,
  /// Sent as a bearer token when set.
  pub token:    Option<String>,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080".to_string(),
      token:    None,
    }
  }
}

/// Bind address for `warden serve`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
  pub host: String,
  pub port: u16,
}

impl Default for ServerSettings {
  fn default() -> Self {
    Self {
      host: "127.0.0.1".to_string(),
      port: 3000,
    }
  }
}

impl ServerSettings {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

impl Settings {
  /// Read `path` if it exists and overlay the environment.
  pub fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("WARDEN")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

#[cfg(test)]
mod tests {
  use warden_core::format::{Currency, Locale};

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/warden.toml")).unwrap();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.format, FormatConfig::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("warden-settings-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      r#"
        [api]
        base_url = "https://gate.example.ng/v1"

        [server]
        port = 9090

        [format]
        locale = "fr-FR"
        currency = "EUR"
      "#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.api.base_url, "https://gate.example.ng/v1");
    assert_eq!(settings.api.token, None);
    assert_eq!(settings.server.address(), "127.0.0.1:9090");
    assert_eq!(settings.format.locale, Locale::FrFr);
    assert_eq!(settings.format.currency, Currency::Eur);
  }
}
