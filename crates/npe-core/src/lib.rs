//! npe-core
//!
//! Pure domain types for the case-practice pipeline: catalogs, field specs,
//! the response parser, and the sanitizer that turns untrusted model output
//! into a validated answer. No AWS SDK dependency.

pub mod catalog;
pub mod error;
pub mod models;
pub mod parse;
pub mod sanitize;
pub mod schema;
