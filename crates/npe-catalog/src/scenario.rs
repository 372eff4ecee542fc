//! Randomized scenario selection for case generation.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use npe_core::models::scenario::ScenarioParameters;

use crate::Registry;
use crate::sampling::sample_without_replacement;

/// Shape of the option set shown to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Target plus distractors.
    pub option_count: usize,
    /// Draw distractors from the differential map where it has an entry.
    pub use_differentials: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            option_count: 4,
            use_differentials: true,
        }
    }
}

/// Resolve the age group, pick a target diagnosis, and build a shuffled
/// option set around it.
///
/// Distractors come from the target's mapped neighbors when there are enough
/// of them. Otherwise every neighbor is used and the rest are drawn from the
/// full catalog, never repeating the target or a chosen neighbor.
pub fn build_scenario<R: Rng + ?Sized>(
    registry: &Registry,
    client_group_hint: &str,
    rng: &mut R,
) -> ScenarioParameters {
    let profile = registry.resolve_age_group(client_group_hint);
    let config = registry.scenario;
    let needed = config.option_count.saturating_sub(1);

    let catalog = registry.diagnoses.entries();
    let target = catalog[rng.gen_range(0..catalog.len())].clone();

    let neighbors: &[String] = if config.use_differentials {
        registry.differentials.neighbors(&target).unwrap_or_default()
    } else {
        &[]
    };

    let mut distractors = sample_without_replacement(rng, neighbors, needed, &[target.as_str()]);
    let from_neighbors = distractors.len();

    if distractors.len() < needed {
        let top_up = {
            let mut exclude = vec![target.as_str()];
            exclude.extend(distractors.iter().map(String::as_str));
            sample_without_replacement(rng, catalog, needed - distractors.len(), &exclude)
        };
        distractors.extend(top_up);
    }

    debug!(
        target = %target,
        from_neighbors,
        topped_up = distractors.len() - from_neighbors,
        age_group = %profile.key,
        "built scenario"
    );

    let mut option_set = distractors;
    option_set.push(target.clone());
    option_set.shuffle(rng);

    ScenarioParameters {
        age_group_label: profile.label.clone(),
        age_range_hint: profile.age_range.clone(),
        context_hints: profile.context_hints.clone(),
        developmental_notes: profile.developmental_notes.clone(),
        target_category: target,
        option_set,
    }
}

/// [`build_scenario`] with the thread-local RNG.
pub fn build_random_scenario(registry: &Registry, client_group_hint: &str) -> ScenarioParameters {
    build_scenario(registry, client_group_hint, &mut rand::thread_rng())
}
