pub const NAME: &str = "DIAGNOSES";

pub const DIAGNOSES: &[&str] = &[
    "Attention-Deficit/Hyperactivity Disorder",
    "Autism Spectrum Disorder",
    "Schizophrenia",
    "Bipolar I Disorder",
    "Bipolar II Disorder",
    "Major Depressive Disorder",
    "Persistent Depressive Disorder",
    "Generalised Anxiety Disorder",
    "Panic Disorder",
    "Social Anxiety Disorder",
    "Separation Anxiety Disorder",
    "Obsessive-Compulsive Disorder",
    "Post-Traumatic Stress Disorder",
    "Adjustment Disorder",
    "Somatic Symptom Disorder",
    "Anorexia Nervosa",
    "Bulimia Nervosa",
    "Binge-Eating Disorder",
    "Oppositional Defiant Disorder",
    "Conduct Disorder",
    "Substance Use Disorder",
    "Borderline Personality Disorder",
    "Antisocial Personality Disorder",
    "Delirium",
    "Mild Neurocognitive Disorder",
    "Major Neurocognitive Disorder",
];
