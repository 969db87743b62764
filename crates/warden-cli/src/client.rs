//! Async HTTP client for the remote record API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use warden_core::{diff::Patch, record::EntityKind};

use crate::settings::ApiSettings;

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  settings: ApiSettings,
}

impl ApiClient {
  pub fn new(settings: ApiSettings) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, settings })
  }

  fn url(&self, entity: EntityKind, id: &str) -> String {
    format!(
      "{}/{}/{}",
      self.settings.base_url.trim_end_matches('/'),
      entity.collection(),
      id
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.settings.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// `GET /{collection}/{id}`
  pub async fn fetch(&self, entity: EntityKind, id: &str) -> Result<Value> {
    let url = self.url(entity, id);
    let resp = self
      .auth(self.client.get(&url))
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {url} → {}", resp.status()));
    }
    resp.json().await.with_context(|| format!("deserialising {entity}"))
  }

  /// `PATCH /{collection}/{id}` with the patch as a JSON object.
  pub async fn patch(&self, entity: EntityKind, id: &str, patch: &Patch) -> Result<()> {
    let url = self.url(entity, id);
    let resp = self
      .auth(self.client.patch(&url))
      .json(patch)
      .send()
      .await
      .with_context(|| format!("PATCH {url} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("PATCH {url} → {}", resp.status()));
    }
    Ok(())
  }
}
