//! The concrete output contracts: which fields each answer has and which
//! allow-list and count bounds apply to each.

use npe_core::catalog::Catalog;
use npe_core::error::CoreError;
use npe_core::models::scenario::ScenarioParameters;
use npe_core::schema::{AnswerSpec, CountBounds, FieldSpec};

use crate::Registry;

pub const MODEL_DIFFERENTIALS: CountBounds = CountBounds::exactly(2);
pub const MODEL_ASSESSMENTS: CountBounds = CountBounds::new(3, 6);
pub const MODEL_STRATEGIES: CountBounds = CountBounds::new(2, 4);

pub const CASE_DIFFERENTIALS: CountBounds = CountBounds::new(2, 3);
pub const CASE_ASSESSMENTS: CountBounds = CountBounds::new(3, 6);
pub const CASE_STRATEGIES: CountBounds = CountBounds::new(2, 4);
const CASE_KEY_SYMPTOMS_MAX: usize = 8;
const CASE_MAINTAINING_FACTORS_MAX: usize = 6;

pub const PREFERRED_STRATEGIES: CountBounds = CountBounds::new(0, 4);

/// Steps 1–7 model answer, wrapped in a `model` object.
pub fn model_answer_spec(registry: &Registry) -> AnswerSpec<'_> {
    AnswerSpec::new(
        Some("/model"),
        vec![
            FieldSpec::text("/model/step1")
                .required()
                .withhold_labels()
                .guidance("1–2 sentences covering timeframe and functional impairment."),
            FieldSpec::text("/model/step2")
                .required()
                .withhold_labels()
                .guidance("Maintaining mechanisms (not labels)."),
            FieldSpec::choice("/model/step3", &registry.diagnoses)
                .guidance("Single best-fit provisional diagnosis."),
            FieldSpec::choices("/model/step4", &registry.diagnoses, MODEL_DIFFERENTIALS)
                .guidance("Differential diagnoses."),
            FieldSpec::text("/model/step4_rationale")
                .guidance("One line per differential: why it is less likely."),
            FieldSpec::choices("/model/step5", &registry.assessments, MODEL_ASSESSMENTS)
                .repairable()
                .guidance(
                    "Required for ALL age groups. Prefer age-appropriate tools \
                     (e.g. WISC/WPPSI with CBCL/SDQ for youth).",
                ),
            FieldSpec::choice("/model/step6", &registry.modalities)
                .guidance("One primary treatment modality."),
            FieldSpec::choices("/model/step7", &registry.strategies, MODEL_STRATEGIES)
                .guidance("Intervention strategies linked to the maintaining factors."),
        ],
    )
}

/// Per-request allow-lists derived from a scenario's option set.
#[derive(Debug, Clone)]
pub struct CaseCatalogs {
    /// Only the target; the answer key must name it.
    pub target: Catalog,
    pub options: Catalog,
    pub distractors: Catalog,
}

impl CaseCatalogs {
    pub fn for_scenario(scenario: &ScenarioParameters) -> Result<Self, CoreError> {
        Ok(Self {
            target: Catalog::new("TARGET", [scenario.target_category.as_str()])?,
            options: Catalog::new("DIAGNOSIS OPTIONS", scenario.option_set.iter().cloned())?,
            distractors: Catalog::new("DIFFERENTIAL OPTIONS", scenario.distractors())?,
        })
    }
}

/// A practice case: narrative, student prompts, and the answer key.
pub fn case_spec<'a>(registry: &'a Registry, catalogs: &'a CaseCatalogs) -> AnswerSpec<'a> {
    AnswerSpec::new(
        Some("/case"),
        vec![
            FieldSpec::text("/case/title")
                .required()
                .withhold_labels()
                .guidance("Short neutral title."),
            FieldSpec::text("/case/vignette")
                .required()
                .withhold_labels()
                .guidance(
                    "1–2 short paragraphs, at most 1700 characters. Include timeframe, \
                     functional impairment, and a couple of realistic distractor features.",
                ),
            FieldSpec::text("/case/setting")
                .guidance("e.g. GP referral, university counselling, private practice."),
            FieldSpec::text("/case/demographics")
                .withhold_labels()
                .guidance("Brief age range, role, and context; nothing identifying."),
            FieldSpec::text("/studentTasks/step1_presenting_issue")
                .withhold_labels()
                .guidance("Question prompting the student to summarise the presenting issue."),
            FieldSpec::text("/studentTasks/step2_maintaining_factors")
                .withhold_labels()
                .guidance("Question prompting the student to identify maintaining factors."),
            FieldSpec::text("/studentTasks/step3_provisional_diagnosis")
                .withhold_labels()
                .guidance("Question asking for a provisional diagnosis from the options."),
            FieldSpec::text("/studentTasks/step4_differentials")
                .withhold_labels()
                .guidance("Question asking which differentials to rule out and why."),
            FieldSpec::text("/studentTasks/step5_assessments")
                .withhold_labels()
                .guidance("Question asking which assessments to administer."),
            FieldSpec::text("/studentTasks/step6_primary_modality")
                .withhold_labels()
                .guidance("Question asking for the primary treatment modality."),
            FieldSpec::text("/studentTasks/step7_intervention_strategies")
                .withhold_labels()
                .guidance("Question asking for intervention strategies."),
            FieldSpec::choice("/answerKey/target_disorder", &catalogs.target)
                .guidance("The hidden target disorder, verbatim."),
            FieldSpec::text_list("/answerKey/key_symptoms", CASE_KEY_SYMPTOMS_MAX)
                .required()
                .guidance("Key symptoms evident in the vignette."),
            FieldSpec::text_list("/answerKey/maintaining_factors", CASE_MAINTAINING_FACTORS_MAX)
                .required()
                .guidance("Maintaining factors evident in the vignette."),
            FieldSpec::choice("/answerKey/provisional_diagnosis", &catalogs.options)
                .guidance("Best-fit diagnosis from the options."),
            FieldSpec::annotated(
                "/answerKey/differentials_with_rationale",
                &catalogs.distractors,
                "why_not_best_fit",
                CASE_DIFFERENTIALS,
            )
            .guidance("Distractor options, each with why it is not the best fit."),
            FieldSpec::annotated(
                "/answerKey/assessments_with_rationale",
                &registry.assessments,
                "why",
                CASE_ASSESSMENTS,
            )
            .repairable()
            .guidance("Age-appropriate assessments, each with why."),
            FieldSpec::choice("/answerKey/primary_modality", &registry.modalities)
                .guidance("One primary treatment modality."),
            FieldSpec::text("/answerKey/primary_modality_rationale")
                .required()
                .guidance("Concise, evidence-based rationale."),
            FieldSpec::annotated(
                "/answerKey/strategies_with_rationale",
                &registry.strategies,
                "why",
                CASE_STRATEGIES,
            )
            .guidance("Strategies, each with why."),
        ],
    )
}

/// Caller-supplied treatment preferences for a case. Unknown values are
/// dropped; both fields may be left empty.
pub fn preferences_spec(registry: &Registry) -> AnswerSpec<'_> {
    AnswerSpec::new(
        None,
        vec![
            FieldSpec::choice("/primaryModality", &registry.modalities).optional(),
            FieldSpec::choices("/strategies", &registry.strategies, PREFERRED_STRATEGIES)
                .optional(),
        ],
    )
}
