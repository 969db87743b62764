//! Core types and form logic for the Warden estate-access dashboard.
//!
//! This crate is deliberately free of HTTP and I/O. Every function here is a
//! pure transform over in-memory records, so it can be called from request
//! handlers, the CLI, or tests without any setup.

pub mod category;
pub mod contractor;
pub mod diff;
pub mod entity;
pub mod error;
pub mod form;
pub mod format;
pub mod pagination;
pub mod patterns;
pub mod person;
pub mod record;
pub mod site;
pub mod validation;

pub use error::{Error, Result};
