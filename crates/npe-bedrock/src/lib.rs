//! npe-bedrock
//!
//! Prompt composition, Bedrock generation, and the validate-and-repair
//! pipeline on top of npe-core and npe-catalog.

pub mod client;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod prompt;
pub mod repair;
