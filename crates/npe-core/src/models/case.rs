use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::sanitize::ValidatedAnswer;

/// Top-level key of the answer-key section of a generated case.
pub const ANSWER_KEY_SECTION: &str = "answerKey";

/// Provenance attached to every generated case.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CaseMeta {
    pub request_id: Uuid,
    pub model: String,
    pub reveal_key: bool,
    pub generated_at: jiff::Timestamp,
}

/// A validated case together with the option set shown to the student.
#[derive(Debug, Clone)]
pub struct GeneratedCase {
    pub answer: ValidatedAnswer,
    pub options: Vec<String>,
    pub meta: CaseMeta,
}

impl GeneratedCase {
    /// The caller-facing JSON. The answer key is dropped unless the request
    /// asked for it.
    pub fn to_response(&self) -> Value {
        let mut body = self.answer.to_value();
        if let Value::Object(map) = &mut body {
            if !self.meta.reveal_key {
                map.remove(ANSWER_KEY_SECTION);
            }
            map.insert("options".to_string(), serde_json::json!(self.options));
            map.insert(
                "_meta".to_string(),
                serde_json::to_value(&self.meta).unwrap_or(Value::Null),
            );
        }
        body
    }
}
