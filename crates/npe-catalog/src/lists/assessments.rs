pub const NAME: &str = "ASSESSMENTS";

/// Instruments are listed with their abbreviation first, as clinicians
/// write them in reports.
pub const ASSESSMENTS: &[&str] = &[
    "WAIS (Wechsler Adult Intelligence Scale)",
    "WISC (Wechsler Intelligence Scale for Children)",
    "WPPSI (Wechsler Preschool and Primary Scale of Intelligence)",
    "Stanford-Binet (Stanford-Binet Intelligence Scales)",
    "WASI (Wechsler Abbreviated Scale of Intelligence)",
    "Woodcock-Johnson Test of Cognitive Abilities",
    "Raven's Standard Progressive Matrices",
    "WIAT (Wechsler Individual Achievement Test)",
    "WMS (Wechsler Memory Scale)",
    "WRAML (Wide Range Assessment of Memory and Learning)",
    "WHO-DAS (World Health Organisation Disability Assessment Scale)",
    "WHO-QOL (World Health Organisation Quality of Life Scale)",
    "ABAS (Adaptive Behavior Assessment System)",
    "ORS (Outcome Rating Scale)",
    "BDI (Beck Depression Inventory)",
    "DASS (Depression Anxiety Stress Scale)",
    "K10 (Kessler Psychological Distress Scale)",
    "STAI (State Trait Anxiety Inventory)",
    "MMPI (Minnesota Multiphasic Personality Inventory)",
    "PAI (Personality Assessment Inventory)",
    "PHQ-9 (Patient Health Questionnaire 9 Item)",
    "Structured Clinical Interview for DSM (SCID)",
    "CBCL (Achenbach Child Behaviour Checklist)",
    "SDQ (Strengths and Difficulties Questionnaire)",
];
