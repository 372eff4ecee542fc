use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use npe_bedrock::error::GenerationError;
use npe_bedrock::gateway::{GenerationRequest, Generator};
use npe_bedrock::pipeline::{
    CASE_TEMPERATURE, GENERATION_DEADLINE, MODEL_ANSWER_TEMPERATURE, RAW_DIAGNOSTIC_CHARS,
    generate_case, generate_model_answer, resolve_preferences,
};
use npe_bedrock::repair::REPAIR_TEMPERATURE;
use npe_catalog::Registry;
use npe_core::models::request::{CaseRequest, ModelAnswerRequest};
use serde_json::{Value, json};

type Reply = Box<dyn Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync>;

/// Records every request and answers with `reply`, optionally after a
/// per-call delay.
struct StubGenerator {
    reply: Reply,
    calls: Mutex<Vec<GenerationRequest>>,
    delays: Mutex<VecDeque<Duration>>,
}

impl StubGenerator {
    fn new(
        reply: impl Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
        }
    }

    /// Delay the n-th call by `delays[n]`; later calls answer at once.
    fn with_delays(self, delays: Vec<Duration>) -> Self {
        *self.delays.lock().unwrap() = VecDeque::from(delays);
        self
    }

    /// Replies in order; an exhausted script returns empty text.
    fn scripted(replies: Vec<Result<String, GenerationError>>) -> Self {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        })
    }

    fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Generator for StubGenerator {
    fn model_id(&self) -> &str {
        "test-model"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.reply)(request)
    }
}

fn request() -> ModelAnswerRequest {
    ModelAnswerRequest {
        client_age: "adult".to_string(),
        vignette: "A 34-year-old reports six months of uncontrollable worry.".to_string(),
    }
}

fn model_answer(step5: &[&str]) -> Value {
    json!({
        "model": {
            "step1": "Six months of excessive worry with impaired work performance.",
            "step2": "Reassurance seeking and avoidance of uncertainty.",
            "step3": "Generalised Anxiety Disorder",
            "step4": ["Major Depressive Disorder", "Panic Disorder"],
            "step4_rationale": "Mood is reactive; no discrete panic attacks.",
            "step5": step5,
            "step6": "Cognitive Behavioural Therapy",
            "step7": ["Psychoeducation", "Cognitive restructuring"]
        }
    })
}

const THREE_ASSESSMENTS: [&str; 3] = [
    "DASS (Depression Anxiety Stress Scale)",
    "K10 (Kessler Psychological Distress Scale)",
    "STAI (State Trait Anxiety Inventory)",
];

#[tokio::test]
async fn valid_response_needs_one_call() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![Ok(model_answer(&THREE_ASSESSMENTS).to_string())]);

    let answer = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap();

    assert_eq!(answer.text("/model/step3"), "Generalised Anxiety Disorder");
    assert_eq!(answer.labels("/model/step5"), THREE_ASSESSMENTS.to_vec());
    assert!(answer.deficiencies().is_empty());

    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].temperature, MODEL_ANSWER_TEMPERATURE);
    assert!(calls[0].prompt.contains("six months of uncontrollable worry"));
}

#[tokio::test]
async fn fenced_response_with_prose_is_salvaged() {
    let registry = Registry::builtin().unwrap();
    let raw = format!(
        "Here is the answer:\n```json\n{}\n```\nLet me know!",
        model_answer(&THREE_ASSESSMENTS)
    );
    let generator = StubGenerator::scripted(vec![Ok(raw)]);

    let answer = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap();

    assert_eq!(answer.text("/model/step6"), "Cognitive Behavioural Therapy");
}

#[tokio::test]
async fn short_assessment_list_is_repaired_once() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&["K10 (Kessler Psychological Distress Scale)"]).to_string()),
        Ok(json!({ "step5": THREE_ASSESSMENTS }).to_string()),
    ]);

    let answer = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap();

    assert_eq!(answer.labels("/model/step5"), THREE_ASSESSMENTS.to_vec());

    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].temperature, REPAIR_TEMPERATURE);
    assert!(calls[1].prompt.contains("\"step5\""));
    assert!(calls[1].prompt.contains("six months of uncontrollable worry"));
}

#[tokio::test]
async fn repair_reply_is_filtered_like_the_original() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&[]).to_string()),
        Ok(json!({
            "step5": [
                "K10 (Kessler Psychological Distress Scale)",
                "Made-up Inventory",
                "K10 (Kessler Psychological Distress Scale)",
                "DASS (Depression Anxiety Stress Scale)",
                "PHQ-9 (Patient Health Questionnaire 9 Item)"
            ]
        })
        .to_string()),
    ]);

    let answer = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap();

    assert_eq!(
        answer.labels("/model/step5"),
        vec![
            "K10 (Kessler Psychological Distress Scale)",
            "DASS (Depression Anxiety Stress Scale)",
            "PHQ-9 (Patient Health Questionnaire 9 Item)",
        ]
    );
}

#[tokio::test]
async fn failed_repair_is_not_retried() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&["K10 (Kessler Psychological Distress Scale)"]).to_string()),
        Ok(json!({ "step5": ["DASS (Depression Anxiety Stress Scale)"] }).to_string()),
        Ok(json!({ "step5": THREE_ASSESSMENTS }).to_string()),
    ]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    let GenerationError::Incomplete { partial, .. } = err else {
        panic!("expected Incomplete, got {err:?}");
    };
    // The rejected repair leaves the original value in place.
    assert_eq!(
        partial.labels("/model/step5"),
        vec!["K10 (Kessler Psychological Distress Scale)"]
    );
    let deficiencies = partial.deficiencies();
    assert_eq!(deficiencies.len(), 1);
    assert_eq!(deficiencies[0].pointer, "/model/step5");
    assert_eq!(generator.calls().len(), 2);
}

#[tokio::test]
async fn unparseable_repair_reply_leaves_answer_incomplete() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&[]).to_string()),
        Ok("Sorry, I cannot help with that.".to_string()),
    ]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Incomplete { .. }));
    assert_eq!(generator.calls().len(), 2);
}

#[tokio::test]
async fn response_without_braces_is_unparseable() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![Ok("x".repeat(5000))]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    let GenerationError::Unparseable { raw } = err else {
        panic!("expected Unparseable, got {err:?}");
    };
    assert_eq!(raw.chars().count(), RAW_DIAGNOSTIC_CHARS);
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test]
async fn object_without_envelope_is_unparseable() {
    let registry = Registry::builtin().unwrap();
    let unwrapped = model_answer(&THREE_ASSESSMENTS)["model"].to_string();
    let generator = StubGenerator::scripted(vec![Ok(unwrapped)]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Unparseable { .. }));
}

#[tokio::test]
async fn empty_vignette_is_rejected_before_generation() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![]);
    let input = ModelAnswerRequest {
        client_age: "adult".to_string(),
        vignette: "   ".to_string(),
    };

    let err = generate_model_answer(&generator, &registry, &input)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidInput(_)));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![Err(GenerationError::Transport {
        status: Some(503),
        message: "unavailable".to_string(),
    })]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Transport {
            status: Some(503),
            ..
        }
    ));
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test]
async fn transport_failure_during_repair_propagates() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&[]).to_string()),
        Err(GenerationError::Transport {
            status: None,
            message: "timed out".to_string(),
        }),
    ]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport { .. }));
    assert_eq!(generator.calls().len(), 2);
}

#[tokio::test]
async fn unlisted_diagnosis_is_incomplete_without_repair() {
    let registry = Registry::builtin().unwrap();
    let mut reply = model_answer(&THREE_ASSESSMENTS);
    reply["model"]["step3"] = json!("Anxiety");
    let generator = StubGenerator::scripted(vec![Ok(reply.to_string())]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    let GenerationError::Incomplete { partial, raw } = err else {
        panic!("expected Incomplete, got {err:?}");
    };
    assert_eq!(partial.text("/model/step3"), "");
    assert!(raw.contains("Anxiety"));
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test]
async fn surplus_differentials_are_cut_to_the_maximum() {
    let registry = Registry::builtin().unwrap();
    let mut reply = model_answer(&THREE_ASSESSMENTS);
    reply["model"]["step4"] = json!([
        "Major Depressive Disorder",
        "Panic Disorder",
        "Social Anxiety Disorder"
    ]);
    let generator = StubGenerator::scripted(vec![Ok(reply.to_string())]);

    let answer = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap();

    assert_eq!(
        answer.labels("/model/step4"),
        vec!["Major Depressive Disorder", "Panic Disorder"]
    );
}

#[tokio::test]
async fn short_strategy_list_is_not_repaired() {
    let registry = Registry::builtin().unwrap();
    let mut reply = model_answer(&THREE_ASSESSMENTS);
    reply["model"]["step7"] = json!(["Psychoeducation"]);
    let generator = StubGenerator::scripted(vec![
        Ok(reply.to_string()),
        Ok(json!({ "step7": ["Psychoeducation", "Cognitive restructuring"] }).to_string()),
    ]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    let GenerationError::Incomplete { partial, .. } = err else {
        panic!("expected Incomplete, got {err:?}");
    };
    let pointers: Vec<String> = partial
        .deficiencies()
        .into_iter()
        .map(|d| d.pointer)
        .collect();
    assert_eq!(pointers, vec!["/model/step7"]);
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test]
async fn short_differential_list_is_not_repaired() {
    let registry = Registry::builtin().unwrap();
    let mut reply = model_answer(&THREE_ASSESSMENTS);
    reply["model"]["step4"] = json!(["Major Depressive Disorder"]);
    let generator = StubGenerator::scripted(vec![Ok(reply.to_string())]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    let GenerationError::Incomplete { partial, .. } = err else {
        panic!("expected Incomplete, got {err:?}");
    };
    assert_eq!(partial.deficiencies()[0].pointer, "/model/step4");
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_generation_times_out_as_transport() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![Ok(model_answer(&THREE_ASSESSMENTS).to_string())])
        .with_delays(vec![GENERATION_DEADLINE * 2]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport { status: None, .. }));
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_covers_the_repair_call() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::scripted(vec![
        Ok(model_answer(&[]).to_string()),
        Ok(json!({ "step5": THREE_ASSESSMENTS }).to_string()),
    ])
    .with_delays(vec![
        GENERATION_DEADLINE / 2,
        GENERATION_DEADLINE / 2 + Duration::from_secs(1),
    ]);

    let err = generate_model_answer(&generator, &registry, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport { status: None, .. }));
    assert_eq!(generator.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_case_generation_times_out_as_transport() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::new(|req| Ok(case_reply(&req.prompt, &THREE_ASSESSMENTS)))
        .with_delays(vec![GENERATION_DEADLINE + Duration::from_secs(1)]);

    let err = generate_case(&generator, &registry, &CaseRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport { status: None, .. }));
}

/// The value following `prefix` on its line.
fn line_after<'a>(prompt: &'a str, prefix: &str) -> &'a str {
    prompt
        .lines()
        .find_map(|l| l.strip_prefix(prefix))
        .unwrap()
        .trim()
}

/// The bullet items under `header`.
fn listed<'a>(prompt: &'a str, header: &str) -> Vec<&'a str> {
    prompt
        .lines()
        .skip_while(|l| *l != header)
        .skip(1)
        .map_while(|l| l.strip_prefix("- "))
        .collect()
}

fn case_reply(prompt: &str, assessments: &[&str]) -> String {
    let target = line_after(prompt, "Target disorder (hidden from student): ");
    let distractors = listed(prompt, "ALLOWED DIFFERENTIAL OPTIONS:");

    json!({
        "case": {
            "title": "New job, new worries",
            "vignette": "Sam, 29, describes months of tension and poor sleep since a promotion.",
            "setting": "GP referral",
            "demographics": "Adult, late 20s, office worker"
        },
        "studentTasks": {
            "step1_presenting_issue": "Summarise the presenting issue.",
            "step3_provisional_diagnosis": "Which option best fits?"
        },
        "answerKey": {
            "target_disorder": target,
            "key_symptoms": ["tension", "poor sleep"],
            "maintaining_factors": ["avoidance"],
            "provisional_diagnosis": target,
            "differentials_with_rationale": distractors
                .iter()
                .take(2)
                .map(|d| json!({ "name": d, "why_not_best_fit": "Fewer supporting features." }))
                .collect::<Vec<_>>(),
            "assessments_with_rationale": assessments
                .iter()
                .map(|a| json!({ "name": a, "why": "Baseline severity." }))
                .collect::<Vec<_>>(),
            "primary_modality": "Cognitive Behavioural Therapy",
            "primary_modality_rationale": "Strong evidence base for this presentation.",
            "strategies_with_rationale": [
                { "name": "Psychoeducation", "why": "Normalises symptoms." },
                { "name": "Cognitive restructuring", "why": "Targets catastrophic appraisals." }
            ]
        }
    })
    .to_string()
}

#[tokio::test]
async fn case_hides_answer_key_unless_revealed() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::new(|req| Ok(case_reply(&req.prompt, &THREE_ASSESSMENTS)));

    let hidden = generate_case(&generator, &registry, &CaseRequest::default())
        .await
        .unwrap()
        .to_response();
    assert!(hidden.get("answerKey").is_none());
    assert!(hidden["case"]["vignette"].as_str().unwrap().contains("promotion"));
    assert_eq!(hidden["options"].as_array().unwrap().len(), 4);
    assert_eq!(hidden["_meta"]["model"], "test-model");
    assert_eq!(hidden["_meta"]["revealKey"], false);

    let revealed_request = CaseRequest {
        reveal_key: true,
        ..Default::default()
    };
    let case = generate_case(&generator, &registry, &revealed_request)
        .await
        .unwrap();
    let target = case.answer.text("/answerKey/target_disorder").to_string();
    assert!(case.options.contains(&target));

    let revealed = case.to_response();
    assert_eq!(revealed["answerKey"]["target_disorder"], target.as_str());
    assert_eq!(
        revealed["answerKey"]["differentials_with_rationale"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(revealed["_meta"]["revealKey"], true);

    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.temperature == CASE_TEMPERATURE));
}

#[tokio::test]
async fn case_naming_another_target_is_incomplete() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::new(|req| {
        let mut reply: Value =
            serde_json::from_str(&case_reply(&req.prompt, &THREE_ASSESSMENTS)).unwrap();
        let distractor = listed(&req.prompt, "ALLOWED DIFFERENTIAL OPTIONS:")[0];
        reply["answerKey"]["target_disorder"] = json!(distractor);
        Ok(reply.to_string())
    });

    let err = generate_case(&generator, &registry, &CaseRequest::default())
        .await
        .unwrap_err();

    let GenerationError::Incomplete { partial, .. } = err else {
        panic!("expected Incomplete, got {err:?}");
    };
    assert_eq!(
        partial.deficiencies()[0].pointer,
        "/answerKey/target_disorder"
    );
}

#[tokio::test]
async fn case_assessments_are_repaired() {
    let registry = Registry::builtin().unwrap();
    let generator = StubGenerator::new(|req| {
        if req.prompt.starts_with("Your previous answer") {
            let items: Vec<Value> = THREE_ASSESSMENTS
                .iter()
                .map(|a| json!({ "name": a, "why": "Screens severity." }))
                .collect();
            Ok(json!({ "assessments_with_rationale": items }).to_string())
        } else {
            Ok(case_reply(&req.prompt, &["K10 (Kessler Psychological Distress Scale)"]))
        }
    });

    let case = generate_case(&generator, &registry, &CaseRequest::default())
        .await
        .unwrap();

    assert_eq!(
        case.answer.labels("/answerKey/assessments_with_rationale"),
        THREE_ASSESSMENTS.to_vec()
    );
    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].prompt.contains("Target disorder (hidden from student):"));
}

#[test]
fn preferences_outside_the_allow_lists_are_dropped() {
    let registry = Registry::builtin().unwrap();
    let request = CaseRequest {
        primary_modality: Some("  Family Therapy ".to_string()),
        strategies: vec![
            "Psychoeducation".to_string(),
            "Hypnosis".to_string(),
            "Psychoeducation".to_string(),
            "Gradual exposure".to_string(),
        ],
        ..Default::default()
    };

    let preferences = resolve_preferences(&registry, &request);
    assert_eq!(preferences.modality, "Family Therapy");
    assert_eq!(preferences.strategies, vec!["Psychoeducation", "Gradual exposure"]);

    let unknown = CaseRequest {
        primary_modality: Some("Art therapy".to_string()),
        ..Default::default()
    };
    let preferences = resolve_preferences(&registry, &unknown);
    assert!(preferences.modality.is_empty());
    assert!(preferences.strategies.is_empty());
}
