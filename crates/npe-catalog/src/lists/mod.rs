//! The built-in allow-lists. Spelling and casing here are the only spelling
//! and casing the sanitizer accepts.

pub mod assessments;
pub mod diagnoses;
pub mod modalities;
pub mod strategies;
