//! Round budget planning
//!
//! The budget is computed once from the catalog size and fixes how many
//! rounds each phase lasts and how many items survive it. Every round shows
//! `CANDIDATES_PER_ROUND` items, so a phase that must show `n` items `k`
//! times each needs `ceil(n * k / 3)` rounds.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SorterConfig;
use crate::error::{Result, SorterError};
use crate::CANDIDATES_PER_ROUND;

/// Per-phase round counts and survivor targets for one tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBudget {
    pub phase1_rounds: usize,
    /// Appearances each item should reach during discovery
    pub phase1_min_appearances: u32,
    /// Expected survivors of the discovery cut (informational)
    pub phase1_survivors: usize,
    pub phase2_rounds: usize,
    /// Finalists kept at the end of the elimination phase
    pub phase2_survivors: usize,
    pub phase3_rounds: usize,
    pub total_rounds: usize,
}

impl RoundBudget {
    /// Plan a tournament over `item_count` items
    pub fn plan(item_count: usize, config: &SorterConfig) -> Result<Self> {
        if item_count < 1 {
            return Err(SorterError::Config(format!(
                "Cannot plan a tournament for {} items",
                item_count
            )));
        }
        config.validate()?;

        let multiple = config.round_multiple;
        let min_appearances = config.min_discovery_appearances;

        let phase1_exposures = item_count * min_appearances as usize;
        let phase1_rounds = round_up(phase1_exposures.div_ceil(CANDIDATES_PER_ROUND), multiple);
        let phase1_survivors = (item_count * config.survivor_percent as usize).div_ceil(100);

        let phase2_exposures = phase1_survivors * config.elimination_exposure_percent as usize;
        let phase2_rounds = round_up(
            phase2_exposures.div_ceil(100 * CANDIDATES_PER_ROUND),
            multiple,
        );
        let phase2_survivors = config.finalist_count.min(phase1_survivors);

        let phase3_rounds = head_to_head_rounds(
            phase2_survivors,
            config.finalist_min_appearances,
            multiple,
        );

        let budget = Self {
            phase1_rounds,
            phase1_min_appearances: min_appearances,
            phase1_survivors,
            phase2_rounds,
            phase2_survivors,
            phase3_rounds,
            total_rounds: phase1_rounds + phase2_rounds + phase3_rounds,
        };

        info!(
            items = item_count,
            discovery = budget.phase1_rounds,
            elimination = budget.phase2_rounds,
            head_to_head = budget.phase3_rounds,
            total = budget.total_rounds,
            "planned round budget"
        );

        Ok(budget)
    }

    /// Last round of the discovery phase
    pub fn phase1_end(&self) -> usize {
        self.phase1_rounds
    }

    /// Last round of the elimination phase
    pub fn phase2_end(&self) -> usize {
        self.phase1_rounds + self.phase2_rounds
    }
}

/// Rounds needed for the head-to-head phase over `finalists` items.
///
/// Each round settles three pairings (A-B, A-C, B-C). The phase is long
/// enough to cover every pairing once and to show every finalist at least
/// `min_appearances` times, whichever needs more rounds.
pub fn head_to_head_rounds(finalists: usize, min_appearances: u32, multiple: usize) -> usize {
    let total_pairs = finalists * finalists.saturating_sub(1) / 2;
    let rounds_for_coverage = total_pairs.div_ceil(3);
    let rounds_for_appearances =
        (finalists * min_appearances as usize).div_ceil(CANDIDATES_PER_ROUND);
    round_up(rounds_for_coverage.max(rounds_for_appearances), multiple)
}

/// Round up to the next multiple, never returning zero
fn round_up(rounds: usize, multiple: usize) -> usize {
    rounds.max(1).div_ceil(multiple) * multiple
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod planner_tests;
