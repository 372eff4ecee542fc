//! Field specifications: the output contract a generated answer is held to.
//!
//! An [`AnswerSpec`] is plain data. The prompt composer reads it to describe
//! the contract to the model, and the sanitizer reads it to enforce the same
//! contract on whatever comes back. Fields are addressed by JSON pointer
//! (`/model/step3`) into the parsed candidate.

use serde_json::{Value, json};

use crate::catalog::Catalog;

/// Inclusive count bounds for a list-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: usize,
    pub max: usize,
}

impl CountBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }

    /// Human-readable cardinality, e.g. `"EXACTLY 2"` or `"2 to 4"`.
    pub fn describe(&self) -> String {
        if self.min == self.max {
            format!("EXACTLY {}", self.min)
        } else {
            format!("{} to {}", self.min, self.max)
        }
    }
}

/// How a single field is coerced and checked.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule<'a> {
    /// Free text, trimmed. Non-string values become `""`.
    Text,
    /// Array of free-text items, trimmed, empties dropped, capped at `max`.
    TextList { max: usize },
    /// One label from `catalog`, or `""` when the value is not a member.
    Choice { catalog: &'a Catalog },
    /// Distinct labels from `catalog`, first-appearance order, capped at
    /// `bounds.max`.
    Choices {
        catalog: &'a Catalog,
        bounds: CountBounds,
    },
    /// Like [`FieldRule::Choices`], but each element is an object
    /// `{ "name": label, <note_key>: text }`.
    AnnotatedChoices {
        catalog: &'a Catalog,
        note_key: &'static str,
        bounds: CountBounds,
    },
}

impl<'a> FieldRule<'a> {
    pub fn catalog(&self) -> Option<&'a Catalog> {
        match *self {
            FieldRule::Choice { catalog }
            | FieldRule::Choices { catalog, .. }
            | FieldRule::AnnotatedChoices { catalog, .. } => Some(catalog),
            FieldRule::Text | FieldRule::TextList { .. } => None,
        }
    }

    pub fn bounds(&self) -> Option<CountBounds> {
        match *self {
            FieldRule::Choices { bounds, .. } | FieldRule::AnnotatedChoices { bounds, .. } => {
                Some(bounds)
            }
            _ => None,
        }
    }

    /// A JSON placeholder showing the expected shape of the value.
    pub fn shape(&self) -> Value {
        match *self {
            FieldRule::Text | FieldRule::Choice { .. } => json!("string"),
            FieldRule::TextList { .. } => json!(["string", "string"]),
            FieldRule::Choices { bounds, .. } => {
                Value::Array(vec![json!("string"); bounds.min.max(1)])
            }
            FieldRule::AnnotatedChoices {
                note_key, bounds, ..
            } => {
                let item = json!({ "name": "string", note_key: "string" });
                Value::Array(vec![item; bounds.min.max(1)])
            }
        }
    }
}

/// One field of the output contract.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<'a> {
    pub pointer: &'static str,
    pub rule: FieldRule<'a>,
    pub required: bool,
    /// Eligible for a single scoped repair request when below its minimum.
    pub repairable: bool,
    /// Diagnostic labels must not appear in this field's text.
    pub withhold_labels: bool,
    /// Short instruction for the model, e.g. `"1–2 sentences; timeframe + impairment"`.
    pub guidance: &'static str,
}

impl<'a> FieldSpec<'a> {
    fn with_rule(pointer: &'static str, rule: FieldRule<'a>, required: bool) -> Self {
        Self {
            pointer,
            rule,
            required,
            repairable: false,
            withhold_labels: false,
            guidance: "",
        }
    }

    pub fn text(pointer: &'static str) -> Self {
        Self::with_rule(pointer, FieldRule::Text, false)
    }

    pub fn text_list(pointer: &'static str, max: usize) -> Self {
        Self::with_rule(pointer, FieldRule::TextList { max }, false)
    }

    pub fn choice(pointer: &'static str, catalog: &'a Catalog) -> Self {
        Self::with_rule(pointer, FieldRule::Choice { catalog }, true)
    }

    pub fn choices(pointer: &'static str, catalog: &'a Catalog, bounds: CountBounds) -> Self {
        Self::with_rule(pointer, FieldRule::Choices { catalog, bounds }, true)
    }

    pub fn annotated(
        pointer: &'static str,
        catalog: &'a Catalog,
        note_key: &'static str,
        bounds: CountBounds,
    ) -> Self {
        Self::with_rule(
            pointer,
            FieldRule::AnnotatedChoices {
                catalog,
                note_key,
                bounds,
            },
            true,
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn repairable(mut self) -> Self {
        self.repairable = true;
        self
    }

    pub fn withhold_labels(mut self) -> Self {
        self.withhold_labels = true;
        self
    }

    pub fn guidance(mut self, guidance: &'static str) -> Self {
        self.guidance = guidance;
        self
    }

    /// The last pointer segment, used as the field's key in prompts and in
    /// repair responses.
    pub fn key(&self) -> &'static str {
        self.pointer.rsplit('/').next().unwrap_or(self.pointer)
    }
}

/// The full output contract for one kind of generated answer.
#[derive(Debug, Clone)]
pub struct AnswerSpec<'a> {
    /// Pointer to an object that must exist in the candidate for it to count
    /// as a response at all, e.g. `/model`.
    pub envelope: Option<&'static str>,
    pub fields: Vec<FieldSpec<'a>>,
}

impl<'a> AnswerSpec<'a> {
    pub fn new(envelope: Option<&'static str>, fields: Vec<FieldSpec<'a>>) -> Self {
        Self { envelope, fields }
    }

    pub fn field(&self, pointer: &str) -> Option<&FieldSpec<'a>> {
        self.fields.iter().find(|f| f.pointer == pointer)
    }

    /// Whether `candidate` carries the envelope object (always true when the
    /// spec has no envelope).
    pub fn has_envelope(&self, candidate: &Value) -> bool {
        match self.envelope {
            Some(pointer) => candidate.pointer(pointer).is_some_and(Value::is_object),
            None => candidate.is_object(),
        }
    }

    /// The JSON skeleton the model is asked to return, with placeholder
    /// values in place of content.
    pub fn skeleton(&self) -> Value {
        let mut root = Value::Object(Default::default());
        for field in &self.fields {
            insert_at_pointer(&mut root, field.pointer, field.rule.shape());
        }
        root
    }
}

/// Insert `value` at `pointer`, creating intermediate objects as needed.
///
/// Only object nesting is supported; array indices in pointers are not.
pub(crate) fn insert_at_pointer(root: &mut Value, pointer: &str, value: Value) {
    let segments: Vec<&str> = pointer.split('/').skip(1).collect();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut cursor = root;
    for segment in parents {
        if !cursor.is_object() {
            *cursor = Value::Object(Default::default());
        }
        let Value::Object(map) = cursor else {
            return;
        };
        cursor = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }

    if !cursor.is_object() {
        *cursor = Value::Object(Default::default());
    }
    if let Value::Object(map) = cursor {
        map.insert(last.to_string(), value);
    }
}
