//! Prompt composition.
//!
//! Every prompt ends with the same contract section, generated from the
//! [`AnswerSpec`]: the allow-lists in full, one rule line per field, the
//! label-withholding rule, and the JSON skeleton. Listing the allowed values
//! only makes invalid output less likely; the sanitizer still enforces them.

use npe_core::catalog::Catalog;
use npe_core::models::request::{CaseRequest, ModelAnswerRequest};
use npe_core::models::scenario::{AgeGroupProfile, ScenarioParameters};
use npe_core::schema::{AnswerSpec, FieldRule, FieldSpec};

use crate::gateway::GenerationRequest;

const NOT_PROVIDED: &str = "(not provided)";

/// A composed (instructions, prompt) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub instructions: String,
    pub prompt: String,
}

impl Prompt {
    pub fn into_request(self, temperature: f32) -> GenerationRequest {
        GenerationRequest {
            instructions: self.instructions,
            prompt: self.prompt,
            temperature,
        }
    }
}

/// Treatment preferences for a case, already filtered to the allow-lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub modality: String,
    pub strategies: Vec<String>,
}

const MODEL_ANSWER_INSTRUCTIONS: &[&str] = &[
    "You write educational model answers for Australian NPE-style case reasoning practice.",
    "Never include real identifying details.",
    "Never give medical or legal advice.",
    "Return ONLY valid JSON. No markdown. No extra keys.",
    "Be concise, exam-like, and specific to the vignette.",
];

const CASE_INSTRUCTIONS: &[&str] = &[
    "You write fictional, de-identified clinical training vignettes for an Australian \
     psychology exam practice tool.",
    "Never use real people. Never give medical advice. Keep cases plausible and concise.",
    "Return ONLY valid JSON. No markdown, no commentary, no extra keys.",
];

const REPAIR_INSTRUCTIONS: &str = "Return ONLY valid JSON. No markdown. No extra keys.";

/// Prompt for a Steps 1–7 model answer to a caller-supplied vignette.
pub fn compose_model_answer_prompt(
    spec: &AnswerSpec<'_>,
    profile: Option<&AgeGroupProfile>,
    request: &ModelAnswerRequest,
) -> Prompt {
    let mut prompt = String::from("Write an NPE-style model answer for Steps 1–7 of the vignette below.\n\n");
    prompt.push_str(&model_answer_context(request));
    if let Some(profile) = profile {
        prompt.push_str(&format!(
            "\n\nAGE GROUP NOTES ({}, {}):\n{}",
            profile.label, profile.age_range, profile.developmental_notes
        ));
    }
    prompt.push_str("\n\n");
    prompt.push_str(&contract_section(spec));

    Prompt {
        instructions: MODEL_ANSWER_INSTRUCTIONS.join("\n"),
        prompt,
    }
}

/// The caller context repeated in a model-answer repair prompt.
pub fn model_answer_context(request: &ModelAnswerRequest) -> String {
    let age = request.client_age.trim();
    format!(
        "CLIENT AGE GROUP (optional context): {}\n\nVIGNETTE:\n{}",
        if age.is_empty() { NOT_PROVIDED } else { age },
        request.vignette.trim()
    )
}

/// Prompt for one practice case built around `scenario`.
pub fn compose_case_prompt(
    spec: &AnswerSpec<'_>,
    scenario: &ScenarioParameters,
    request: &CaseRequest,
    preferences: &Preferences,
) -> Prompt {
    let focus = request.focus();
    let strategies = if preferences.strategies.is_empty() {
        "N/A".to_string()
    } else {
        preferences.strategies.join(", ")
    };

    let mut prompt = String::from("Generate one case for exam practice.\n\n");
    prompt.push_str(&case_context(scenario));
    prompt.push_str(&format!(
        "\nContext hints: {}\nDevelopmental considerations: {}\n\
         Difficulty: {}\nDomain emphasis: {}\nUser focus (optional): {}\n\
         Preferred modality (optional): {}\nPreferred strategies (optional): {}\n\n",
        scenario.context_hints,
        scenario.developmental_notes,
        request.difficulty.as_str(),
        request.domain(),
        if focus.is_empty() { "N/A" } else { &focus },
        if preferences.modality.is_empty() {
            "N/A"
        } else {
            &preferences.modality
        },
        strategies,
    ));

    prompt.push_str(&format!(
        "The student will choose the provisional diagnosis from these options:\n{}\n\n",
        bullets(&scenario.option_set)
    ));

    prompt.push_str(
        "Case rules:\n\
         - The vignette must clearly fit the target disorder while including a couple of \
           realistic features that point toward the other options.\n\
         - studentTasks are BLANK prompts for the student (questions or guidance), not answers.\n\
         - The answerKey is exam-style: concise, practical, evidence-based.\n\
         - If a preferred modality is given, use it as the primary modality unless clearly \
           inappropriate. Include preferred strategies when plausible.\n\n",
    );
    prompt.push_str(&contract_section(spec));

    Prompt {
        instructions: CASE_INSTRUCTIONS.join("\n"),
        prompt,
    }
}

/// The scenario context repeated in a case repair prompt.
pub fn case_context(scenario: &ScenarioParameters) -> String {
    format!(
        "Target disorder (hidden from student): {}\nClient group: {} ({})\n",
        scenario.target_category, scenario.age_group_label, scenario.age_range_hint
    )
}

/// Prompt asking again for one list field only: its allow-list, its bounds,
/// and the caller context, nothing else from the original request.
pub fn compose_repair_prompt(field: &FieldSpec<'_>, context: &str) -> Prompt {
    let key = field.key();
    let skeleton = serde_json::json!({ key: field.rule.shape() });

    let mut prompt = format!("Your previous answer had too few items for \"{key}\".\n\n");
    prompt.push_str(context.trim_end());
    prompt.push_str(&format!("\n\nReturn ONLY JSON:\n{skeleton}\n\nRules:\n"));

    if let (Some(catalog), Some(bounds)) = (field.rule.catalog(), field.rule.bounds()) {
        prompt.push_str(&format!(
            "- Choose {} items ONLY from this list (exact spelling):\n{}\n",
            bounds.describe(),
            catalog.bullet_list()
        ));
    }
    if let FieldRule::AnnotatedChoices { note_key, .. } = field.rule {
        prompt.push_str(&format!(
            "- Each item is an object with \"name\" (exact list value) and \"{note_key}\".\n"
        ));
    }

    Prompt {
        instructions: REPAIR_INSTRUCTIONS.to_string(),
        prompt: prompt.trim_end().to_string(),
    }
}

/// Allow-lists, per-field rules, and the JSON skeleton for `spec`.
fn contract_section(spec: &AnswerSpec<'_>) -> String {
    let mut out = String::from("You MUST choose ONLY from the allowed options below.\n\n");

    let mut listed: Vec<&Catalog> = Vec::new();
    for catalog in spec.fields.iter().filter_map(|f| f.rule.catalog()) {
        if listed.iter().any(|c| std::ptr::eq(*c, catalog)) {
            continue;
        }
        out.push_str(&format!("ALLOWED {}:\n{}\n\n", catalog.name(), catalog.bullet_list()));
        listed.push(catalog);
    }

    out.push_str("RULES:\n");
    for field in &spec.fields {
        out.push_str(&rule_line(field));
        out.push('\n');
    }

    let withheld: Vec<String> = spec
        .fields
        .iter()
        .filter(|f| f.withhold_labels)
        .map(|f| display_path(f.pointer))
        .collect();
    if !withheld.is_empty() {
        out.push_str(&format!(
            "- Do NOT include diagnostic labels in: {}. Labels are allowed in the other fields.\n",
            withheld.join(", ")
        ));
    }
    out.push_str("- Use the EXACT spelling and capitalisation from the allowed lists. No synonyms.\n\n");

    let skeleton = serde_json::to_string_pretty(&spec.skeleton()).unwrap_or_default();
    out.push_str(&format!("Return ONLY JSON with exactly these keys:\n{skeleton}"));
    out
}

fn rule_line(field: &FieldSpec<'_>) -> String {
    let path = display_path(field.pointer);
    let rule = match field.rule {
        FieldRule::Text => String::new(),
        FieldRule::TextList { max } => format!("list of up to {max} short items."),
        FieldRule::Choice { catalog } => {
            format!("choose EXACTLY ONE value from ALLOWED {}.", catalog.name())
        }
        FieldRule::Choices { catalog, bounds } => format!(
            "choose {} values from ALLOWED {}.",
            bounds.describe(),
            catalog.name()
        ),
        FieldRule::AnnotatedChoices {
            catalog,
            note_key,
            bounds,
        } => format!(
            "choose {} items from ALLOWED {}, each {{\"name\": <value>, \"{note_key}\": <reason>}}.",
            bounds.describe(),
            catalog.name()
        ),
    };

    let mut line = format!("- {path}:");
    for part in [rule.as_str(), field.guidance] {
        if !part.is_empty() {
            line.push(' ');
            line.push_str(part);
        }
    }
    if field.withhold_labels {
        line.push_str(" NO diagnostic labels.");
    }
    line
}

/// `/answerKey/primary_modality` → `answerKey.primary_modality`.
fn display_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
