use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

/// Draw up to `count` distinct labels from `pool`, skipping anything in
/// `exclude`. Every eligible subset of that size is equally likely.
///
/// Returns fewer than `count` labels when the pool runs out; it never
/// repeats a label, even if `pool` does.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[String],
    count: usize,
    exclude: &[&str],
) -> Vec<String> {
    let mut seen = HashSet::new();
    let eligible: Vec<&String> = pool
        .iter()
        .filter(|label| !exclude.contains(&label.as_str()))
        .filter(|label| seen.insert(label.as_str()))
        .collect();

    eligible
        .choose_multiple(rng, count)
        .map(|label| (*label).clone())
        .collect()
}
