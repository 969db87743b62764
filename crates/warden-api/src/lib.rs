//! JSON preflight API for Warden edit forms.
//!
//! Exposes an axum [`Router`] that validates candidate records, applies
//! person category transitions, and reduces edits to minimal PATCH bodies.
//! The router holds no state; auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", warden_api::api_router())
//! ```

pub mod error;
pub mod persons;
pub mod preflight;

use axum::{
  Router,
  routing::{get, post},
};
use warden_core::{contractor::ContractorRecord, person::PersonRecord, site::SiteRecord};

pub use error::ApiError;

/// Build the preflight API router.
pub fn api_router() -> Router<()> {
  Router::new()
    // Persons
    .route("/categories", get(persons::categories))
    .route("/persons/validate", post(persons::validate))
    .route("/persons/transition", post(persons::transition))
    // Preflight (validate + diff)
    .route(
      "/contractors/preflight",
      post(preflight::handler::<ContractorRecord>),
    )
    .route("/persons/preflight", post(preflight::handler::<PersonRecord>))
    .route("/sites/preflight", post(preflight::handler::<SiteRecord>))
}

// ─── Integration tests ────────────────────────────────────────────────────────
