//! Phase-boundary elimination
//!
//! Runs after every scored round but only acts on the last round of the
//! discovery and elimination phases. Elimination is one-way: nothing here
//! ever clears the flag.

use serde::Serialize;
use tracing::info;

use crate::config::SorterConfig;
use crate::phase::{Phase, PhaseContext};
use crate::planner::RoundBudget;
use crate::types::{Item, ItemId};

/// Outcome of a phase-boundary cut
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationReport {
    /// Phase that just ended
    pub phase: Phase,
    pub eliminated: Vec<ItemId>,
    pub survivors: usize,
}

/// Apply the cut for the round that was just completed.
///
/// Returns `None` unless `completed` is the final round of the discovery or
/// elimination phase.
pub fn run_elimination(
    items: &mut [Item],
    completed: &PhaseContext,
    budget: &RoundBudget,
    config: &SorterConfig,
) -> Option<EliminationReport> {
    if !completed.is_last_round() {
        return None;
    }

    let report = match completed.phase {
        Phase::Discovery => cut_non_winners(items, config),
        Phase::Elimination => {
            let report = keep_finalists(items, budget.phase2_survivors);
            for item in items.iter_mut().filter(|item| item.is_active()) {
                item.h2h.reset();
            }
            report
        }
        Phase::HeadToHead => return None,
    };

    // The next phase balances exposure from scratch
    for item in items.iter_mut() {
        item.phase_appearances = 0;
    }

    info!(
        phase = %report.phase,
        eliminated = report.eliminated.len(),
        survivors = report.survivors,
        "phase complete"
    );

    Some(report)
}

/// End of discovery: drop every item that never scored above the cut.
///
/// Never leaves fewer than `survivor_floor` items standing; when the cut
/// would, the best of the doomed items are spared in catalog order.
fn cut_non_winners(items: &mut [Item], config: &SorterConfig) -> EliminationReport {
    let active: Vec<usize> = (0..items.len()).filter(|&i| items[i].is_active()).collect();
    let (mut doomed, passing): (Vec<usize>, Vec<usize>) = active
        .iter()
        .copied()
        .partition(|&i| items[i].score <= config.discovery_cut_score);

    let floor = config.survivor_floor.min(active.len());
    if passing.len() < floor {
        doomed.sort_by(|&a, &b| items[b].score.cmp(&items[a].score));
        let spared = floor - passing.len();
        doomed.drain(..spared);
    }

    let eliminated = doomed
        .iter()
        .map(|&i| {
            items[i].eliminated = true;
            items[i].id.clone()
        })
        .collect();

    EliminationReport {
        phase: Phase::Discovery,
        eliminated,
        survivors: active.len() - doomed.len(),
    }
}

/// End of elimination: keep exactly `keep` of the highest scorers.
///
/// Ties keep their catalog order.
fn keep_finalists(items: &mut [Item], keep: usize) -> EliminationReport {
    let mut ranked: Vec<usize> = (0..items.len()).filter(|&i| items[i].is_active()).collect();
    ranked.sort_by(|&a, &b| items[b].score.cmp(&items[a].score));

    let survivors = ranked.len().min(keep);
    let eliminated = ranked[survivors..]
        .iter()
        .map(|&i| {
            items[i].eliminated = true;
            items[i].id.clone()
        })
        .collect();

    EliminationReport {
        phase: Phase::Elimination,
        eliminated,
        survivors,
    }
}

#[cfg(test)]
#[path = "elimination_tests.rs"]
mod elimination_tests;
