//! Schema enforcement for parsed model output.
//!
//! [`sanitize`] never fails. Every field in the [`AnswerSpec`] produces a value of the
//! right shape, whatever the candidate held; values that break a membership
//! or cardinality rule are dropped rather than substituted. Whether the
//! result is usable is a separate verdict, see [`is_complete`].

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::schema::{AnswerSpec, FieldRule, FieldSpec, insert_at_pointer};

/// A multi-choice label paired with its free-text rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedChoice {
    pub name: String,
    pub note: String,
}

/// A sanitized field value. The variant always matches the field's rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Choice(String),
    Choices(Vec<String>),
    AnnotatedChoices {
        note_key: &'static str,
        items: Vec<AnnotatedChoice>,
    },
}

impl FieldValue {
    /// Number of kept items for list-valued fields; 0 or 1 for scalars.
    pub fn count(&self) -> usize {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => usize::from(!s.is_empty()),
            FieldValue::TextList(items) | FieldValue::Choices(items) => items.len(),
            FieldValue::AnnotatedChoices { items, .. } => items.len(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => Value::String(s.clone()),
            FieldValue::TextList(items) | FieldValue::Choices(items) => json!(items),
            FieldValue::AnnotatedChoices { note_key, items } => Value::Array(
                items
                    .iter()
                    .map(|item| json!({ "name": item.name, *note_key: item.note }))
                    .collect(),
            ),
        }
    }
}

/// One field after sanitization, with its completeness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedField {
    pub pointer: &'static str,
    pub value: FieldValue,
    /// Why the field fails its completeness policy, if it does.
    pub deficiency: Option<String>,
}

/// A field that failed its completeness policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deficiency {
    pub pointer: String,
    pub reason: String,
}

/// The enforced answer. Built only by [`sanitize`]; a repaired field can
/// replace an existing one via [`ValidatedAnswer::with_field`], which yields
/// a new answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswer {
    fields: Vec<SanitizedField>,
}

impl ValidatedAnswer {
    pub fn fields(&self) -> &[SanitizedField] {
        &self.fields
    }

    pub fn field(&self, pointer: &str) -> Option<&SanitizedField> {
        self.fields.iter().find(|f| f.pointer == pointer)
    }

    pub fn get(&self, pointer: &str) -> Option<&FieldValue> {
        self.field(pointer).map(|f| &f.value)
    }

    /// Text of a text or single-choice field; `""` for anything else.
    pub fn text(&self, pointer: &str) -> &str {
        match self.get(pointer) {
            Some(FieldValue::Text(s) | FieldValue::Choice(s)) => s,
            _ => "",
        }
    }

    /// Labels of a list-valued field, in order; empty for anything else.
    pub fn labels(&self, pointer: &str) -> Vec<&str> {
        match self.get(pointer) {
            Some(FieldValue::TextList(items) | FieldValue::Choices(items)) => {
                items.iter().map(String::as_str).collect()
            }
            Some(FieldValue::AnnotatedChoices { items, .. }) => {
                items.iter().map(|i| i.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn deficiencies(&self) -> Vec<Deficiency> {
        self.fields
            .iter()
            .filter_map(|f| {
                f.deficiency.as_ref().map(|reason| Deficiency {
                    pointer: f.pointer.to_string(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }

    /// Replace the field at `field.pointer`, consuming this answer.
    pub fn with_field(mut self, field: SanitizedField) -> Self {
        match self.fields.iter_mut().find(|f| f.pointer == field.pointer) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    /// The answer as nested JSON, one key per pointer segment.
    pub fn to_value(&self) -> Value {
        let mut root = Value::Object(Default::default());
        for field in &self.fields {
            insert_at_pointer(&mut root, field.pointer, field.value.to_json());
        }
        root
    }
}

impl Serialize for ValidatedAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Sanitize a parsed candidate (or the absence of one) against `spec`.
pub fn sanitize(candidate: Option<&Value>, spec: &AnswerSpec<'_>) -> ValidatedAnswer {
    let fields = spec
        .fields
        .iter()
        .map(|field| sanitize_field(candidate.and_then(|c| c.pointer(field.pointer)), field))
        .collect();

    ValidatedAnswer { fields }
}

/// True when no field fails its completeness policy.
pub fn is_complete(answer: &ValidatedAnswer) -> bool {
    answer.fields.iter().all(|f| f.deficiency.is_none())
}

/// Sanitize the raw value found for one field.
pub fn sanitize_field(value: Option<&Value>, field: &FieldSpec<'_>) -> SanitizedField {
    let value = match field.rule {
        FieldRule::Text => FieldValue::Text(value.map(clean_text).unwrap_or_default()),
        FieldRule::TextList { max } => FieldValue::TextList(
            as_items(value)
                .map(clean_text)
                .filter(|s| !s.is_empty())
                .take(max)
                .collect(),
        ),
        FieldRule::Choice { catalog } => {
            let label = value.map(stringify).unwrap_or_default();
            FieldValue::Choice(if catalog.contains(&label) {
                label
            } else {
                String::new()
            })
        }
        FieldRule::Choices { catalog, bounds } => {
            let mut kept: Vec<String> = Vec::new();
            for label in as_items(value).map(stringify) {
                if kept.len() >= bounds.max {
                    break;
                }
                if catalog.contains(&label) && !kept.contains(&label) {
                    kept.push(label);
                }
            }
            FieldValue::Choices(kept)
        }
        FieldRule::AnnotatedChoices {
            catalog,
            note_key,
            bounds,
        } => {
            let mut kept: Vec<AnnotatedChoice> = Vec::new();
            for item in as_items(value) {
                if kept.len() >= bounds.max {
                    break;
                }
                let (name, note) = match item {
                    Value::Object(map) => (
                        map.get("name").map(stringify).unwrap_or_default(),
                        map.get(note_key).map(clean_text).unwrap_or_default(),
                    ),
                    other => (stringify(other), String::new()),
                };
                if catalog.contains(&name) && !kept.iter().any(|k| k.name == name) {
                    kept.push(AnnotatedChoice { name, note });
                }
            }
            FieldValue::AnnotatedChoices {
                note_key,
                items: kept,
            }
        }
    };

    let deficiency = assess(field, &value);
    SanitizedField {
        pointer: field.pointer,
        value,
        deficiency,
    }
}

fn assess(field: &FieldSpec<'_>, value: &FieldValue) -> Option<String> {
    if let Some(bounds) = field.rule.bounds() {
        let count = value.count();
        let out_of_bounds = !bounds.contains(count);
        // An optional list may be left empty, but not partially filled.
        if out_of_bounds && (field.required || count > 0) {
            return Some(format!(
                "{count} allow-listed value(s), expected {}",
                bounds.describe()
            ));
        }
        return None;
    }

    if field.required && value.count() == 0 {
        let reason = match field.rule {
            FieldRule::Choice { .. } => "no allow-listed value",
            FieldRule::TextList { .. } => "required list is empty",
            _ => "required text is empty",
        };
        return Some(reason.to_string());
    }

    None
}

fn as_items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// Strings are trimmed; everything else becomes empty.
fn clean_text(value: &Value) -> String {
    value.as_str().map(str::trim).unwrap_or_default().to_string()
}

/// Scalars are rendered as text and trimmed; containers and null become empty.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
