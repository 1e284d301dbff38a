use super::*;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use crate::types::ItemId;

fn items_with_appearances(appearances: &[u32]) -> Vec<Item> {
    appearances
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            let mut item = Item::new(format!("item-{i}"));
            item.appearances = a;
            item.phase_appearances = a;
            item
        })
        .collect()
}

fn budget() -> RoundBudget {
    RoundBudget {
        phase1_rounds: 5,
        phase1_min_appearances: 2,
        phase1_survivors: 4,
        phase2_rounds: 5,
        phase2_survivors: 4,
        phase3_rounds: 10,
        total_rounds: 20,
    }
}

fn context(phase: Phase, max_phase_rounds: usize) -> PhaseContext {
    PhaseContext {
        phase,
        phase_round: 1,
        max_phase_rounds,
    }
}

fn assert_distinct(selected: &[usize]) {
    let unique: HashSet<_> = selected.iter().collect();
    assert_eq!(unique.len(), selected.len(), "duplicate candidate in {selected:?}");
}

#[test]
fn test_discovery_first_round_draws_three_distinct() {
    let items = items_with_appearances(&[0; 6]);
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..50 {
        let selected = engine.select(&context(Phase::Discovery, 5), None, &mut rng);
        assert_eq!(selected.len(), 3);
        assert_distinct(&selected);
    }
}

#[test]
fn test_discovery_exhausts_unseen_items_first() {
    let items = items_with_appearances(&[1, 1, 1, 0, 0, 1]);
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..50 {
        let selected = engine.select(&context(Phase::Discovery, 5), None, &mut rng);
        assert_eq!(selected.len(), 3);
        assert!(selected.contains(&3));
        assert!(selected.contains(&4));
    }
}

#[test]
fn test_discovery_includes_stragglers_unconditionally() {
    let items = items_with_appearances(&[2, 3, 2, 2, 1]);
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..50 {
        let selected = engine.select(&context(Phase::Discovery, 5), None, &mut rng);
        assert_eq!(selected.len(), 3);
        assert_distinct(&selected);
        assert!(selected.contains(&4));
    }
}

#[test]
fn test_discovery_flattens_when_everyone_met_target() {
    let items = items_with_appearances(&[9, 2, 2, 2, 2, 2]);
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(4);
    let mut overexposed_picks = 0;

    for _ in 0..500 {
        let selected = engine.select(&context(Phase::Discovery, 5), None, &mut rng);
        assert_eq!(selected.len(), 3);
        if selected.contains(&0) {
            overexposed_picks += 1;
        }
    }

    // Weight 2 against 256 for each of the others
    assert!(overexposed_picks < 25, "picked {overexposed_picks} times");
}

#[test]
fn test_eliminated_items_never_selected() {
    let mut items = items_with_appearances(&[0; 8]);
    for item in items.iter_mut().take(4) {
        item.eliminated = true;
    }
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(5);

    for phase in [Phase::Discovery, Phase::Elimination, Phase::HeadToHead] {
        for _ in 0..30 {
            let selected = engine.select(&context(phase, 10), None, &mut rng);
            assert_eq!(selected.len(), 3);
            assert!(selected.iter().all(|&i| i >= 4), "{phase}: {selected:?}");
        }
    }
}

#[test]
fn test_fewer_than_three_active_items() {
    let mut items = items_with_appearances(&[0, 0, 0, 0]);
    items[0].eliminated = true;
    items[2].eliminated = true;
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(6);

    for phase in [Phase::Discovery, Phase::Elimination, Phase::HeadToHead] {
        let mut selected = engine.select(&context(phase, 5), None, &mut rng);
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 3]);
    }
}

#[test]
fn test_elimination_balances_phase_local_appearances() {
    let mut items = items_with_appearances(&[5, 5, 5, 5, 5, 5]);
    for (item, local) in items.iter_mut().zip([1, 1, 1, 0, 1, 1]) {
        item.phase_appearances = local;
    }
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let selected = engine.select(&context(Phase::Elimination, 5), None, &mut rng);
        assert!(selected.contains(&3));
    }
}

#[test]
fn test_head_to_head_tiers_once_balanced() {
    let mut items = items_with_appearances(&[6; 9]);
    for (i, item) in items.iter_mut().enumerate() {
        item.score = 20 - i as u32;
        item.phase_appearances = 3;
    }
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(8);

    for _ in 0..100 {
        let selected = engine.select(&context(Phase::HeadToHead, 10), None, &mut rng);
        assert_eq!(selected.len(), 3);
        assert_distinct(&selected);
        assert!(selected.iter().any(|&i| i < 3), "no top-tier pick in {selected:?}");
        assert!(selected.iter().any(|&i| (3..6).contains(&i)), "no mid-tier pick in {selected:?}");
    }
}

#[test]
fn test_head_to_head_under_represented_first() {
    let mut items = items_with_appearances(&[6; 9]);
    for (i, item) in items.iter_mut().enumerate() {
        item.phase_appearances = if i % 3 == 0 { 0 } else { 3 };
    }
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let mut rng = StdRng::seed_from_u64(9);

    let mut selected = engine.select(&context(Phase::HeadToHead, 10), None, &mut rng);
    selected.sort_unstable();
    assert_eq!(selected, vec![0, 3, 6]);
}

#[test]
fn test_repeated_slot_triggers_shuffle() {
    let items = items_with_appearances(&[0, 0, 0]);
    let budget = budget();
    let engine = SelectionEngine::new(&items, &budget);
    let previous = HistoryEntry {
        round: 1,
        candidates: vec![ItemId::from("item-0"), ItemId::from("item-1"), ItemId::from("item-2")],
        winner: ItemId::from("item-0"),
        timestamp: Utc::now(),
    };

    let mut rng = StdRng::seed_from_u64(10);
    let unshuffled = engine.select(&context(Phase::HeadToHead, 5), None, &mut rng);
    assert_eq!(unshuffled, vec![0, 1, 2]);

    let reordered = (0..50).any(|_| {
        engine.select(&context(Phase::HeadToHead, 5), Some(&previous), &mut rng) != vec![0, 1, 2]
    });
    assert!(reordered, "repeated slots were never shuffled");
}

#[test]
fn test_phase_minimum() {
    // 10 rounds * 3 slots over 9 finalists = 3 each, target one below
    assert_eq!(phase_minimum(&context(Phase::HeadToHead, 10), 9, 2), 2);
    assert_eq!(phase_minimum(&context(Phase::Elimination, 25), 15, 1), 4);
    assert_eq!(phase_minimum(&context(Phase::Elimination, 5), 60, 1), 1);
}
