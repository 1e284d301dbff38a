//! Weighted sampling without replacement
//!
//! Roulette-wheel selection: each draw picks an entry with probability
//! proportional to its weight among the entries not drawn yet. The random
//! source is always passed in so selections are reproducible under a seeded
//! generator.

use rand::seq::SliceRandom;
use rand::Rng;

/// Draw up to `count` distinct indices into `weights`.
///
/// Negative and non-finite weights count as zero. Drawing stops early when
/// the remaining weight sums to zero; callers are expected to backfill the
/// missing slots themselves.
pub fn weighted_sample<R: Rng + ?Sized>(weights: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
    let mut pool: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .map(|(index, &w)| (index, sanitize(w)))
        .collect();
    let mut picked = Vec::with_capacity(count.min(pool.len()));

    while picked.len() < count && !pool.is_empty() {
        let total: f64 = pool.iter().map(|&(_, w)| w).sum();
        if total <= 0.0 {
            break;
        }

        let mut remaining = rng.gen::<f64>() * total;
        let mut chosen = None;
        for (slot, &(_, w)) in pool.iter().enumerate() {
            remaining -= w;
            if remaining <= 0.0 && w > 0.0 {
                chosen = Some(slot);
                break;
            }
        }
        // Rounding can leave a sliver of weight unclaimed; take the last live entry
        let slot = match chosen {
            Some(slot) => slot,
            None => match pool.iter().rposition(|&(_, w)| w > 0.0) {
                Some(slot) => slot,
                None => break,
            },
        };

        picked.push(pool.remove(slot).0);
    }

    picked
}

/// Uniform random permutation in place (Fisher-Yates)
pub fn shuffle_candidates<T, R: Rng + ?Sized>(candidates: &mut [T], rng: &mut R) {
    candidates.shuffle(rng);
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod sampler_tests;
