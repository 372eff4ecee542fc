//! Targeted repair of a single list field.
//!
//! When a repairable list field comes back below its minimum, the model is
//! asked once more for that field alone. The reply goes through the same
//! parser and the same field rules as the full answer, and replaces the
//! original value only if it now meets the minimum.

use tracing::{info, warn};

use npe_core::parse::parse_candidate;
use npe_core::sanitize::{SanitizedField, ValidatedAnswer, sanitize_field};
use npe_core::schema::FieldSpec;

use crate::error::GenerationError;
use crate::gateway::Generator;
use crate::prompt::compose_repair_prompt;

pub const REPAIR_TEMPERATURE: f32 = 0.2;

/// Whether `field` is repairable and its sanitized value in `answer` holds
/// fewer items than its minimum.
pub fn needs_repair(field: &FieldSpec<'_>, answer: &ValidatedAnswer) -> bool {
    if !field.repairable {
        return false;
    }
    let (Some(bounds), Some(current)) = (field.rule.bounds(), answer.get(field.pointer)) else {
        return false;
    };
    current.count() < bounds.min
}

/// Ask for `field` once more. Returns the re-sanitized field when the reply
/// meets the minimum, `None` when it does not (unparseable, wrong key, too
/// few allow-listed items). Transport failures propagate.
pub async fn repair_field<G: Generator>(
    generator: &G,
    field: &FieldSpec<'_>,
    context: &str,
) -> Result<Option<SanitizedField>, GenerationError> {
    let Some(bounds) = field.rule.bounds() else {
        return Ok(None);
    };

    let request = compose_repair_prompt(field, context).into_request(REPAIR_TEMPERATURE);
    let raw = generator.generate(&request).await?;

    let Some(candidate) = parse_candidate(&raw) else {
        warn!(field = field.pointer, "repair response was not a JSON object");
        return Ok(None);
    };

    let repaired = sanitize_field(candidate.get(field.key()), field);
    let count = repaired.value.count();
    if count < bounds.min {
        warn!(
            field = field.pointer,
            count,
            min = bounds.min,
            "repair response still below minimum"
        );
        return Ok(None);
    }

    info!(field = field.pointer, count, "field repaired");
    Ok(Some(repaired))
}
