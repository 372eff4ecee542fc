use npe_core::models::scenario::AgeGroupProfile;

/// Key of the profile used when a hint is empty or unrecognized.
pub const DEFAULT_AGE_GROUP: &str = "adult";

struct ProfileDef {
    key: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    age_range: &'static str,
    context_hints: &'static str,
    developmental_notes: &'static str,
}

const PROFILES: &[ProfileDef] = &[
    ProfileDef {
        key: "child",
        label: "Child",
        aliases: &["children", "kid", "primary school"],
        age_range: "6–12 years",
        context_hints: "Referral usually via parent, teacher, or GP; school functioning and \
                        family context are central; collateral information from carers is expected.",
        developmental_notes: "Symptoms may present behaviourally (irritability, school refusal, \
                              somatic complaints) rather than as verbal reports; consider \
                              developmental norms and neurodevelopmental differentials.",
    },
    ProfileDef {
        key: "adolescent",
        label: "Adolescent",
        aliases: &["teen", "teenager", "youth", "young person"],
        age_range: "13–17 years",
        context_hints: "Secondary school, peer relationships, social media, and family conflict \
                        are common contexts; consent and confidentiality involve parents.",
        developmental_notes: "Identity formation and peer influence shape presentation; \
                              risk-taking, self-harm, and emerging personality features warrant \
                              screening; prefer youth-normed instruments.",
    },
    ProfileDef {
        key: DEFAULT_AGE_GROUP,
        label: "Adult",
        aliases: &["adults", "working age"],
        age_range: "18–64 years",
        context_hints: "Work, study, relationships, and caring responsibilities are typical \
                        domains of impairment; self-referral or GP mental health plan referral.",
        developmental_notes: "Consider life-stage transitions (study to work, parenthood, \
                              separation) and substance use as maintaining or complicating factors.",
    },
    ProfileDef {
        key: "older_adult",
        label: "Older adult",
        aliases: &["older", "older-adult", "elderly", "senior", "aged"],
        age_range: "65+ years",
        context_hints: "Retirement, bereavement, physical illness, and residential or home-care \
                        settings are common; referral often via GP or aged-care services.",
        developmental_notes: "Distinguish mood and anxiety from cognitive decline and delirium; \
                              medical comorbidity and medication effects are frequent confounds.",
    },
];

pub fn builtin() -> Vec<AgeGroupProfile> {
    PROFILES
        .iter()
        .map(|p| AgeGroupProfile {
            key: p.key.to_string(),
            label: p.label.to_string(),
            aliases: p.aliases.iter().map(|a| a.to_string()).collect(),
            age_range: p.age_range.to_string(),
            context_hints: p.context_hints.to_string(),
            developmental_notes: p.developmental_notes.to_string(),
        })
        .collect()
}
