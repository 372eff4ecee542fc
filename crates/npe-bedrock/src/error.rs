use thiserror::Error;

use npe_core::sanitize::ValidatedAnswer;

/// Terminal outcomes of a generation request other than success.
///
/// The first four are distinct, caller-visible failure kinds; `Config` is a
/// server-side fault.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generation service could not be reached or returned an error.
    #[error("generation service call failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// No JSON object (with the expected envelope) could be recovered.
    #[error("model did not return valid JSON with the required keys")]
    Unparseable { raw: String },

    /// The response parsed, but required fields failed their allow-list or
    /// count rules, even after repair.
    #[error(
        "model response did not comply with required structure/options ({} deficient field(s))",
        .partial.deficiencies().len()
    )]
    Incomplete {
        raw: String,
        partial: ValidatedAnswer,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}
