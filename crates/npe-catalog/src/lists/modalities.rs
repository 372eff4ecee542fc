pub const NAME: &str = "MODALITIES";

pub const MODALITIES: &[&str] = &[
    "Cognitive Behavioural Therapy",
    "Interpersonal Therapy",
    "Family Therapy",
    "Psychodynamic Therapy",
    "Narrative Therapy",
    "Solution-Focused Therapy",
    "Motivational Interviewing",
];
