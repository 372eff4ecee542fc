use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A client age group the generator can write for.
///
/// Everything except `key` and `aliases` is opaque prompt payload and is
/// forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AgeGroupProfile {
    pub key: String,
    pub label: String,
    pub aliases: Vec<String>,
    pub age_range: String,
    pub context_hints: String,
    pub developmental_notes: String,
}

impl AgeGroupProfile {
    /// Case-insensitive, whitespace-trimmed match against the key, the label,
    /// or any alias.
    pub fn matches(&self, hint: &str) -> bool {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return false;
        }
        std::iter::once(&self.key)
            .chain(std::iter::once(&self.label))
            .chain(&self.aliases)
            .any(|candidate| candidate.to_lowercase() == hint)
    }
}

/// The resolved, randomized inputs for one case-generation request.
///
/// `option_set` holds the target exactly once plus its distractors, in
/// shuffled order, with no duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScenarioParameters {
    pub age_group_label: String,
    pub age_range_hint: String,
    pub context_hints: String,
    pub developmental_notes: String,
    pub target_category: String,
    pub option_set: Vec<String>,
}

impl ScenarioParameters {
    /// The options other than the target, in option-set order.
    pub fn distractors(&self) -> Vec<&str> {
        self.option_set
            .iter()
            .map(String::as_str)
            .filter(|o| *o != self.target_category)
            .collect()
    }
}
