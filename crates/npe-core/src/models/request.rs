use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::CoreError;

const FOCUS_MAX_CHARS: usize = 400;
const PREFERENCE_MAX_CHARS: usize = 120;
const PREFERRED_STRATEGIES_MAX: usize = 4;
const DEFAULT_DOMAIN: &str = "Assessment & Intervention";

/// Input for a Steps 1–7 model answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModelAnswerRequest {
    /// Optional free-text age group, e.g. `"adolescent"`.
    #[serde(default)]
    pub client_age: String,
    #[serde(default)]
    pub vignette: String,
}

impl ModelAnswerRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.vignette.trim().is_empty() {
            return Err(CoreError::MissingField("vignette".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Case-insensitive; anything unrecognised is [`Difficulty::Medium`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// Accepts any JSON value, so an unknown difficulty never rejects the whole
/// request.
fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(Difficulty::from_label).unwrap_or_default())
}

/// Input for generating one practice case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CaseRequest {
    #[serde(default)]
    pub client_group: String,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub primary_modality: Option<String>,
    #[serde(default)]
    pub strategies: Vec<String>,
    /// Include the answer key in the response.
    #[serde(default)]
    pub reveal_key: bool,
}

impl CaseRequest {
    pub fn domain(&self) -> &str {
        self.domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DOMAIN)
    }

    pub fn focus(&self) -> String {
        clip(self.focus.as_deref().unwrap_or_default(), FOCUS_MAX_CHARS)
    }

    pub fn primary_modality(&self) -> String {
        clip(
            self.primary_modality.as_deref().unwrap_or_default(),
            PREFERENCE_MAX_CHARS,
        )
    }

    pub fn strategies(&self) -> Vec<String> {
        self.strategies
            .iter()
            .take(PREFERRED_STRATEGIES_MAX)
            .map(|s| clip(s, PREFERENCE_MAX_CHARS))
            .collect()
    }
}

fn clip(s: &str, max_chars: usize) -> String {
    s.trim().chars().take(max_chars).collect()
}
