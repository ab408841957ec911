//! Uniform random selection over a roster minus an exclusion set.
//!
//! Pure helper with no side effects; callers supply the RNG so tests can
//! seed a deterministic generator.

use rand::Rng;

use crate::model::Student;

/// Pick one candidate uniformly at random from `candidates` minus
/// `exclude_ids`. Returns `None` iff the set difference is empty.
pub fn select_random<'a, R: Rng + ?Sized>(
    candidates: &'a [Student],
    exclude_ids: &[String],
    rng: &mut R,
) -> Option<&'a Student> {
    let eligible: Vec<&Student> = candidates
        .iter()
        .filter(|s| !exclude_ids.iter().any(|id| id == &s.id))
        .collect();

    if eligible.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..eligible.len());
    Some(eligible[index])
}
