use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[test]
fn test_draws_distinct_indices() {
    let mut rng = StdRng::seed_from_u64(7);
    let weights = vec![1.0; 10];

    for _ in 0..100 {
        let picked = weighted_sample(&weights, 3, &mut rng);
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(picked.iter().all(|&i| i < 10));
    }
}

#[test]
fn test_zero_weight_entries_never_drawn() {
    let mut rng = StdRng::seed_from_u64(11);
    let weights = vec![0.0, 5.0, 0.0, 1.0, f64::NAN, -3.0];

    for _ in 0..200 {
        let picked = weighted_sample(&weights, 2, &mut rng);
        let set: HashSet<_> = picked.into_iter().collect();
        assert_eq!(set, HashSet::from([1, 3]));
    }
}

#[test]
fn test_stops_when_weight_exhausted() {
    let mut rng = StdRng::seed_from_u64(3);
    let weights = vec![0.0, 2.0, 0.0, 0.0];

    let picked = weighted_sample(&weights, 3, &mut rng);
    assert_eq!(picked, vec![1]);

    assert!(weighted_sample(&[0.0, 0.0], 1, &mut rng).is_empty());
    assert!(weighted_sample(&[], 3, &mut rng).is_empty());
}

#[test]
fn test_count_larger_than_pool() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut picked = weighted_sample(&[1.0, 1.0], 3, &mut rng);
    picked.sort_unstable();
    assert_eq!(picked, vec![0, 1]);
}

#[test]
fn test_heavier_weights_drawn_more_often() {
    let mut rng = StdRng::seed_from_u64(42);
    let weights = vec![1.0, 9.0];
    let mut heavy_first = 0;

    for _ in 0..2000 {
        if weighted_sample(&weights, 1, &mut rng)[0] == 1 {
            heavy_first += 1;
        }
    }

    // Expected 1800; leave plenty of slack
    assert!(heavy_first > 1650 && heavy_first < 1950, "got {heavy_first}");
}

#[test]
fn test_seeded_draws_are_reproducible() {
    let weights = vec![1.0, 2.0, 4.0, 8.0, 16.0];
    let mut a = StdRng::seed_from_u64(99);
    let mut b = StdRng::seed_from_u64(99);

    for _ in 0..20 {
        assert_eq!(
            weighted_sample(&weights, 3, &mut a),
            weighted_sample(&weights, 3, &mut b)
        );
    }
}

#[test]
fn test_shuffle_keeps_members() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut values = vec!["a", "b", "c"];
    shuffle_candidates(&mut values, &mut rng);
    values.sort_unstable();
    assert_eq!(values, vec!["a", "b", "c"]);
}
