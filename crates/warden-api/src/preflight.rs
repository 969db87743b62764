//! Handler for `POST /{contractors,persons,sites}/preflight`.
//!
//! Body: `{"original": <server record>, "candidate": <edited record>}`.
//! The candidate is validated; if it passes, the response carries the
//! minimal PATCH body. An unchanged candidate yields `204 No Content` so the
//! caller skips the network round-trip entirely.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_core::{
  diff::{Patch, Submission},
  entity::Entity,
  form::EditSession,
  record::Record,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PreflightBody {
  pub original:  Value,
  pub candidate: Value,
}

#[derive(Debug, Serialize)]
pub struct PreflightResponse {
  pub patch: Patch,
}

pub async fn handler<E>(Json(body): Json<PreflightBody>) -> Result<Response, ApiError>
where
  E: Entity + Send + Sync + 'static,
{
  let entity = E::SCHEMA.entity;
  let original = Record::from_json(E::SCHEMA, &body.original)?;
  let mut session = EditSession::<E>::new(&original)?;
  session.replace_candidate(E::from_json(&body.candidate)?);

  match session.submit()? {
    Submission::Send(patch) => {
      tracing::debug!(%entity, fields = patch.len(), "preflight produced a patch");
      Ok(Json(PreflightResponse { patch }).into_response())
    }
    Submission::NothingToSubmit => {
      tracing::debug!(%entity, "preflight found nothing to submit");
      Ok(StatusCode::NO_CONTENT.into_response())
    }
  }
}
