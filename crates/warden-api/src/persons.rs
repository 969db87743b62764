//! Person-specific endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/categories` | Creatable categories and the conditional fields each uses |
//! | `POST` | `/persons/validate` | Body: person; 200 or 422 with a validation report |
//! | `POST` | `/persons/transition` | Body: `{"candidate":…,"category":"WORKER"}` |

use std::collections::BTreeMap;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use warden_core::{
  category::{Category, ConditionalField, Requirement},
  entity::Entity,
  person::{self, PersonRecord, apply_category_transition},
  validation::ValidationReport,
};

use crate::error::ApiError;

// ─── Categories ───────────────────────────────────────────────────────────────

/// Field visibility for one category.
#[derive(Debug, Serialize)]
pub struct CategoryRules {
  pub category: Category,
  /// Conditional field name → requirement.
  pub fields:   BTreeMap<&'static str, Requirement>,
}

/// `GET /categories`
pub async fn categories() -> Json<Vec<CategoryRules>> {
  let rules = Category::CREATABLE
    .iter()
    .map(|&category| CategoryRules {
      category,
      fields: ConditionalField::iter()
        .map(|f| (f.name(), category.requirement(f)))
        .collect(),
    })
    .collect();
  Json(rules)
}

// ─── Validate ─────────────────────────────────────────────────────────────────

/// `POST /persons/validate`
pub async fn validate(Json(body): Json<Value>) -> Result<Response, ApiError> {
  let candidate = PersonRecord::from_json(&body)?;
  let result = person::validate(&candidate);
  let status = match &result {
    Ok(_) => StatusCode::OK,
    Err(errors) => {
      tracing::debug!(errors = errors.len(), "person failed validation");
      StatusCode::UNPROCESSABLE_ENTITY
    }
  };
  Ok((status, Json(ValidationReport::from(result))).into_response())
}

// ─── Transition ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
  pub candidate: Value,
  pub category:  String,
}

/// `POST /persons/transition`: returns the candidate with the new category
/// and every no-longer-relevant field cleared.
pub async fn transition(
  Json(body): Json<TransitionBody>,
) -> Result<Json<PersonRecord>, ApiError> {
  let category: Category = body
    .category
    .trim()
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("unknown category {:?}", body.category)))?;
  let candidate = PersonRecord::from_json(&body.candidate)?;
  Ok(Json(apply_category_transition(&candidate, category)))
}
