use super::*;

fn plan(n: usize) -> RoundBudget {
    RoundBudget::plan(n, &SorterConfig::default()).unwrap()
}

#[test]
fn test_plan_for_hundred_items() {
    let budget = plan(100);

    assert_eq!(budget.phase1_rounds, 70);
    assert_eq!(budget.phase1_survivors, 60);
    assert_eq!(budget.phase2_rounds, 25);
    assert_eq!(budget.phase2_survivors, 15);
    assert_eq!(budget.phase3_rounds, 35);
    assert_eq!(budget.total_rounds, 130);
}

#[test]
fn test_plan_for_small_catalog_clamps_finalists() {
    let budget = plan(6);

    assert_eq!(budget.phase1_rounds, 5);
    assert_eq!(budget.phase1_survivors, 4);
    assert_eq!(budget.phase2_rounds, 5);
    assert_eq!(budget.phase2_survivors, 4);
    assert_eq!(budget.phase3_rounds, 10);
    assert_eq!(budget.total_rounds, 20);
}

#[test]
fn test_phase_lengths_are_positive_multiples_of_five() {
    for n in 3..=400 {
        let budget = plan(n);
        for rounds in [budget.phase1_rounds, budget.phase2_rounds, budget.phase3_rounds] {
            assert!(rounds > 0, "n={n}: empty phase");
            assert_eq!(rounds % 5, 0, "n={n}: {rounds} is not a multiple of 5");
        }
        assert_eq!(
            budget.total_rounds,
            budget.phase1_rounds + budget.phase2_rounds + budget.phase3_rounds
        );
    }
}

#[test]
fn test_discovery_covers_minimum_appearances() {
    for n in 1..=200 {
        let budget = plan(n);
        assert!(budget.phase1_rounds * 3 >= n * 2, "n={n}");
    }
}

#[test]
fn test_degenerate_catalogs_still_plan() {
    for n in 1..=3 {
        let budget = plan(n);
        assert!(budget.total_rounds >= 1);
        assert!(budget.phase2_survivors <= n);
    }
    assert_eq!(plan(1).total_rounds, 15);
}

#[test]
fn test_zero_items_is_config_error() {
    let err = RoundBudget::plan(0, &SorterConfig::default()).unwrap_err();
    assert!(matches!(err, SorterError::Config(_)));
}

#[test]
fn test_head_to_head_rounds_cover_all_pairs() {
    // 15 finalists: 105 pairs need 35 rounds, appearances need only 20
    assert_eq!(head_to_head_rounds(15, 4, 5), 35);
    // 25 finalists: 300 pairs need 100 rounds
    assert_eq!(head_to_head_rounds(25, 4, 5), 100);
    // 4 finalists: appearances dominate (16 / 3 -> 6 -> 10)
    assert_eq!(head_to_head_rounds(4, 4, 5), 10);
}

#[test]
fn test_custom_round_multiple() {
    let config = SorterConfig {
        round_multiple: 1,
        ..Default::default()
    };
    let budget = RoundBudget::plan(30, &config).unwrap();

    assert_eq!(budget.phase1_rounds, 20);
    assert_eq!(budget.phase2_rounds, 8);
    assert_eq!(budget.phase3_rounds, 35);
}
