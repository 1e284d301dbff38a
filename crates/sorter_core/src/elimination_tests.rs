use super::*;
use crate::types::HeadToHead;

fn items_with_scores(scores: &[u32]) -> Vec<Item> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let mut item = Item::new(format!("item-{i}"));
            item.score = score;
            item.phase_appearances = 3;
            item.h2h = HeadToHead {
                wins: 1,
                losses: 2,
                matches: 3,
                score: 1,
            };
            item
        })
        .collect()
}

fn budget(phase2_survivors: usize) -> RoundBudget {
    RoundBudget {
        phase1_rounds: 10,
        phase1_min_appearances: 2,
        phase1_survivors: 10,
        phase2_rounds: 5,
        phase2_survivors,
        phase3_rounds: 10,
        total_rounds: 25,
    }
}

fn last_round_of(phase: Phase, max_phase_rounds: usize) -> PhaseContext {
    PhaseContext {
        phase,
        phase_round: max_phase_rounds,
        max_phase_rounds,
    }
}

#[test]
fn test_mid_phase_rounds_are_noops() {
    let mut items = items_with_scores(&[0, 0, 0, 1]);
    let before = items.clone();
    let context = PhaseContext {
        phase: Phase::Discovery,
        phase_round: 3,
        max_phase_rounds: 10,
    };

    let report = run_elimination(&mut items, &context, &budget(6), &SorterConfig::default());

    assert!(report.is_none());
    assert_eq!(items, before);
}

#[test]
fn test_discovery_cut_removes_non_winners() {
    let mut items = items_with_scores(&[3, 0, 1, 0, 2, 0]);

    let report = run_elimination(
        &mut items,
        &last_round_of(Phase::Discovery, 10),
        &budget(6),
        &SorterConfig::default(),
    )
    .unwrap();

    assert_eq!(report.phase, Phase::Discovery);
    assert_eq!(report.survivors, 3);
    assert_eq!(
        report.eliminated,
        vec![ItemId::from("item-1"), ItemId::from("item-3"), ItemId::from("item-5")]
    );
    let active: Vec<bool> = items.iter().map(Item::is_active).collect();
    assert_eq!(active, vec![true, false, true, false, true, false]);
    assert!(items.iter().all(|item| item.phase_appearances == 0));
}

#[test]
fn test_discovery_cut_respects_survivor_floor() {
    let mut items = items_with_scores(&[0, 0, 1, 0, 0, 0]);

    let report = run_elimination(
        &mut items,
        &last_round_of(Phase::Discovery, 10),
        &budget(6),
        &SorterConfig::default(),
    )
    .unwrap();

    // Only item-2 scored; the first two zero-score items are spared
    assert_eq!(report.survivors, 3);
    let active: Vec<bool> = items.iter().map(Item::is_active).collect();
    assert_eq!(active, vec![true, true, true, false, false, false]);
}

#[test]
fn test_discovery_cut_without_floor_can_empty_the_field() {
    let mut items = items_with_scores(&[0, 0, 0]);
    let config = SorterConfig {
        survivor_floor: 0,
        ..Default::default()
    };

    let report = run_elimination(&mut items, &last_round_of(Phase::Discovery, 10), &budget(6), &config)
        .unwrap();

    assert_eq!(report.survivors, 0);
    assert!(items.iter().all(|item| item.eliminated));
}

#[test]
fn test_elimination_keeps_top_finalists_and_resets_records() {
    let mut items = items_with_scores(&[5, 4, 3, 3, 2, 2, 1, 1, 0, 0]);

    let report = run_elimination(
        &mut items,
        &last_round_of(Phase::Elimination, 5),
        &budget(6),
        &SorterConfig::default(),
    )
    .unwrap();

    assert_eq!(report.phase, Phase::Elimination);
    assert_eq!(report.survivors, 6);
    assert_eq!(report.eliminated.len(), 4);

    let survivors: Vec<&str> = items
        .iter()
        .filter(|item| item.is_active())
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(
        survivors,
        vec!["item-0", "item-1", "item-2", "item-3", "item-4", "item-5"]
    );
    for item in items.iter().filter(|item| item.is_active()) {
        assert_eq!(item.h2h, HeadToHead::default());
        assert_eq!(item.phase_appearances, 0);
    }
}

#[test]
fn test_elimination_tie_break_is_stable() {
    let mut items = items_with_scores(&[1, 2, 1, 2, 1]);

    run_elimination(
        &mut items,
        &last_round_of(Phase::Elimination, 5),
        &budget(3),
        &SorterConfig::default(),
    )
    .unwrap();

    let survivors: Vec<&str> = items
        .iter()
        .filter(|item| item.is_active())
        .map(|item| item.id.as_str())
        .collect();
    // Both 2s, then the first 1 in catalog order
    assert_eq!(survivors, vec!["item-0", "item-1", "item-3"]);
}

#[test]
fn test_already_eliminated_items_stay_eliminated() {
    let mut items = items_with_scores(&[9, 8, 7, 6]);
    items[0].eliminated = true;

    let report = run_elimination(
        &mut items,
        &last_round_of(Phase::Elimination, 5),
        &budget(2),
        &SorterConfig::default(),
    )
    .unwrap();

    assert!(items[0].eliminated);
    assert!(!report.eliminated.contains(&ItemId::from("item-0")));
    assert_eq!(report.survivors, 2);
    assert!(items[1].is_active() && items[2].is_active());
    assert!(items[3].eliminated);
}

#[test]
fn test_head_to_head_end_is_noop() {
    let mut items = items_with_scores(&[1, 2, 3]);
    let report = run_elimination(
        &mut items,
        &last_round_of(Phase::HeadToHead, 10),
        &budget(2),
        &SorterConfig::default(),
    );
    assert!(report.is_none());
    assert!(items.iter().all(Item::is_active));
}
