pub const NAME: &str = "STRATEGIES";

pub const STRATEGIES: &[&str] = &[
    "Psychoeducation",
    "Interpersonal therapy techniques",
    "Psychodynamic therapy techniques",
    "Solution-focused techniques",
    "Narrative therapy techniques",
    "Behaviour modification",
    "Gradual exposure",
    "Exposure response prevention",
    "Interoceptive exposure",
    "Prolonged exposure",
    "Cognitive restructuring",
    "Acceptance strategies",
    "Self-management",
    "Relapse prevention",
    "Progressive muscle relaxation",
    "Breathing retraining",
    "Problem solving skills training",
    "Anger management",
    "Social skills training",
    "Assertiveness skills training",
    "Stress management",
    "Mindfulness skills",
    "Parenting skills",
];
