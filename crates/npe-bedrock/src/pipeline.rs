//! End-to-end generation: compose, generate, parse, sanitize, repair,
//! verdict.
//!
//! Both answer kinds run through the same sequence. Each step is total
//! except generation itself, so the only ways out are a validated answer or
//! one of the [`GenerationError`] kinds.

use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use npe_catalog::Registry;
use npe_catalog::scenario::build_random_scenario;
use npe_catalog::specs::{CaseCatalogs, case_spec, model_answer_spec, preferences_spec};
use npe_core::models::case::{CaseMeta, GeneratedCase};
use npe_core::models::request::{CaseRequest, ModelAnswerRequest};
use npe_core::parse::{bounded_raw, parse_candidate};
use npe_core::sanitize::{ValidatedAnswer, is_complete, sanitize};
use npe_core::schema::{AnswerSpec, FieldSpec};

use crate::error::GenerationError;
use crate::gateway::Generator;
use crate::prompt::{
    Preferences, Prompt, case_context, compose_case_prompt, compose_model_answer_prompt,
    model_answer_context,
};
use crate::repair::{needs_repair, repair_field};

pub const MODEL_ANSWER_TEMPERATURE: f32 = 0.3;
pub const CASE_TEMPERATURE: f32 = 0.8;
/// Raw model text attached to errors is cut to this many characters.
pub const RAW_DIAGNOSTIC_CHARS: usize = 2000;
/// Budget for one request end to end, primary call and repair included.
/// Overruns surface as [`GenerationError::Transport`].
pub const GENERATION_DEADLINE: Duration = Duration::from_secs(50);

/// Produce a validated Steps 1–7 model answer for the request's vignette.
pub async fn generate_model_answer<G: Generator>(
    generator: &G,
    registry: &Registry,
    request: &ModelAnswerRequest,
) -> Result<ValidatedAnswer, GenerationError> {
    request
        .validate()
        .map_err(|e| GenerationError::InvalidInput(e.to_string()))?;

    let request_id = Uuid::new_v4();
    let spec = model_answer_spec(registry);
    let profile = registry
        .age_groups()
        .iter()
        .find(|p| p.matches(&request.client_age));

    info!(
        %request_id,
        client_age = %request.client_age.trim(),
        age_group = profile.map(|p| p.key.as_str()),
        vignette_len = request.vignette.len(),
        "generating model answer"
    );

    let prompt = compose_model_answer_prompt(&spec, profile, request);
    let context = model_answer_context(request);

    within_deadline(
        request_id,
        run(
            generator,
            &spec,
            prompt,
            MODEL_ANSWER_TEMPERATURE,
            &context,
            request_id,
        ),
    )
    .await
}

/// Pick a scenario and produce a validated practice case around it.
pub async fn generate_case<G: Generator>(
    generator: &G,
    registry: &Registry,
    request: &CaseRequest,
) -> Result<GeneratedCase, GenerationError> {
    let request_id = Uuid::new_v4();
    let scenario = build_random_scenario(registry, &request.client_group);
    let catalogs =
        CaseCatalogs::for_scenario(&scenario).map_err(|e| GenerationError::Config(e.to_string()))?;
    let spec = case_spec(registry, &catalogs);
    let preferences = resolve_preferences(registry, request);

    info!(
        %request_id,
        age_group = %scenario.age_group_label,
        difficulty = request.difficulty.as_str(),
        options = scenario.option_set.len(),
        "generating case"
    );

    let prompt = compose_case_prompt(&spec, &scenario, request, &preferences);
    let context = case_context(&scenario);

    let answer = within_deadline(
        request_id,
        run(generator, &spec, prompt, CASE_TEMPERATURE, &context, request_id),
    )
    .await?;

    Ok(GeneratedCase {
        answer,
        options: scenario.option_set,
        meta: CaseMeta {
            request_id,
            model: generator.model_id().to_string(),
            reveal_key: request.reveal_key,
            generated_at: jiff::Timestamp::now(),
        },
    })
}

/// Filter the caller's preferred modality and strategies through the
/// allow-lists. Unknown values are dropped silently.
pub fn resolve_preferences(registry: &Registry, request: &CaseRequest) -> Preferences {
    let spec = preferences_spec(registry);
    let candidate = json!({
        "primaryModality": request.primary_modality(),
        "strategies": request.strategies(),
    });
    let resolved = sanitize(Some(&candidate), &spec);

    Preferences {
        modality: resolved.text("/primaryModality").to_string(),
        strategies: resolved
            .labels("/strategies")
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

async fn within_deadline<T>(
    request_id: Uuid,
    work: impl Future<Output = Result<T, GenerationError>>,
) -> Result<T, GenerationError> {
    match tokio::time::timeout(GENERATION_DEADLINE, work).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                %request_id,
                deadline_secs = GENERATION_DEADLINE.as_secs(),
                "generation deadline exceeded"
            );
            Err(GenerationError::Transport {
                status: None,
                message: format!(
                    "generation did not finish within {}s",
                    GENERATION_DEADLINE.as_secs()
                ),
            })
        }
    }
}

async fn run<G: Generator>(
    generator: &G,
    spec: &AnswerSpec<'_>,
    prompt: Prompt,
    temperature: f32,
    context: &str,
    request_id: Uuid,
) -> Result<ValidatedAnswer, GenerationError> {
    let raw = generator.generate(&prompt.into_request(temperature)).await?;

    let Some(candidate) = parse_candidate(&raw).filter(|c| spec.has_envelope(c)) else {
        warn!(
            %request_id,
            raw_len = raw.len(),
            "response was not a JSON object with the expected keys"
        );
        return Err(GenerationError::Unparseable {
            raw: bounded_raw(&raw, RAW_DIAGNOSTIC_CHARS),
        });
    };

    let mut answer = sanitize(Some(&candidate), spec);

    let to_repair: Vec<FieldSpec<'_>> = spec
        .fields
        .iter()
        .filter(|f| needs_repair(f, &answer))
        .copied()
        .collect();

    for field in &to_repair {
        info!(%request_id, field = field.pointer, "requesting repair");
        if let Some(repaired) = repair_field(generator, field, context).await? {
            answer = answer.with_field(repaired);
        }
    }

    if !is_complete(&answer) {
        let deficiencies = answer.deficiencies();
        warn!(
            %request_id,
            deficient = deficiencies.len(),
            first = deficiencies.first().map(|d| d.pointer.as_str()),
            "response incomplete"
        );
        return Err(GenerationError::Incomplete {
            raw: bounded_raw(&raw, RAW_DIAGNOSTIC_CHARS),
            partial: answer,
        });
    }

    info!(%request_id, repaired = to_repair.len(), "response validated");
    Ok(answer)
}
