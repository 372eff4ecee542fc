use std::collections::HashMap;

/// Built-in near-neighbor diagnoses, i.e. what a student could plausibly
/// confuse each category with. Categories missing here get distractors drawn
/// from the whole diagnosis catalog.
pub const DIFFERENTIALS: &[(&str, &[&str])] = &[
    (
        "Generalised Anxiety Disorder",
        &[
            "Major Depressive Disorder",
            "Panic Disorder",
            "Social Anxiety Disorder",
            "Adjustment Disorder",
            "Somatic Symptom Disorder",
        ],
    ),
    (
        "Panic Disorder",
        &[
            "Generalised Anxiety Disorder",
            "Social Anxiety Disorder",
            "Somatic Symptom Disorder",
            "Post-Traumatic Stress Disorder",
        ],
    ),
    (
        "Social Anxiety Disorder",
        &[
            "Generalised Anxiety Disorder",
            "Panic Disorder",
            "Autism Spectrum Disorder",
            "Major Depressive Disorder",
        ],
    ),
    (
        "Separation Anxiety Disorder",
        &[
            "Generalised Anxiety Disorder",
            "Social Anxiety Disorder",
            "Oppositional Defiant Disorder",
            "Adjustment Disorder",
        ],
    ),
    (
        "Major Depressive Disorder",
        &[
            "Persistent Depressive Disorder",
            "Bipolar II Disorder",
            "Adjustment Disorder",
            "Generalised Anxiety Disorder",
        ],
    ),
    (
        "Persistent Depressive Disorder",
        &[
            "Major Depressive Disorder",
            "Bipolar II Disorder",
            "Adjustment Disorder",
        ],
    ),
    (
        "Bipolar I Disorder",
        &[
            "Bipolar II Disorder",
            "Schizophrenia",
            "Borderline Personality Disorder",
            "Substance Use Disorder",
        ],
    ),
    (
        "Bipolar II Disorder",
        &[
            "Bipolar I Disorder",
            "Major Depressive Disorder",
            "Borderline Personality Disorder",
        ],
    ),
    (
        "Obsessive-Compulsive Disorder",
        &[
            "Generalised Anxiety Disorder",
            "Autism Spectrum Disorder",
            "Anorexia Nervosa",
        ],
    ),
    (
        "Post-Traumatic Stress Disorder",
        &[
            "Adjustment Disorder",
            "Major Depressive Disorder",
            "Panic Disorder",
            "Borderline Personality Disorder",
        ],
    ),
    (
        "Adjustment Disorder",
        &[
            "Major Depressive Disorder",
            "Post-Traumatic Stress Disorder",
            "Generalised Anxiety Disorder",
        ],
    ),
    (
        "Anorexia Nervosa",
        &["Bulimia Nervosa", "Binge-Eating Disorder", "Obsessive-Compulsive Disorder"],
    ),
    (
        "Bulimia Nervosa",
        &["Anorexia Nervosa", "Binge-Eating Disorder", "Borderline Personality Disorder"],
    ),
    (
        "Binge-Eating Disorder",
        &["Bulimia Nervosa", "Major Depressive Disorder", "Anorexia Nervosa"],
    ),
    (
        "Attention-Deficit/Hyperactivity Disorder",
        &[
            "Oppositional Defiant Disorder",
            "Autism Spectrum Disorder",
            "Generalised Anxiety Disorder",
            "Conduct Disorder",
        ],
    ),
    (
        "Oppositional Defiant Disorder",
        &[
            "Conduct Disorder",
            "Attention-Deficit/Hyperactivity Disorder",
            "Adjustment Disorder",
        ],
    ),
    (
        "Conduct Disorder",
        &[
            "Oppositional Defiant Disorder",
            "Attention-Deficit/Hyperactivity Disorder",
            "Antisocial Personality Disorder",
        ],
    ),
    (
        "Borderline Personality Disorder",
        &[
            "Bipolar II Disorder",
            "Post-Traumatic Stress Disorder",
            "Major Depressive Disorder",
            "Antisocial Personality Disorder",
        ],
    ),
    (
        "Major Neurocognitive Disorder",
        &["Mild Neurocognitive Disorder", "Delirium", "Major Depressive Disorder"],
    ),
    (
        "Mild Neurocognitive Disorder",
        &["Major Neurocognitive Disorder", "Delirium", "Major Depressive Disorder"],
    ),
    // Fewer than three neighbors: option sets are topped up from the catalog.
    ("Delirium", &["Major Neurocognitive Disorder", "Mild Neurocognitive Disorder"]),
    ("Schizophrenia", &["Bipolar I Disorder", "Substance Use Disorder"]),
];

/// Lookup from a category to its confusable alternatives, in listed order.
#[derive(Debug, Clone, Default)]
pub struct DifferentialMap {
    entries: HashMap<String, Vec<String>>,
}

impl DifferentialMap {
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let entries = pairs
            .iter()
            .map(|(category, neighbors)| {
                (
                    category.to_string(),
                    neighbors.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::from_pairs(DIFFERENTIALS)
    }

    pub fn neighbors(&self, category: &str) -> Option<&[String]> {
        self.entries.get(category).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    /// Number of categories with mapped neighbors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
