//! Phase classification
//!
//! A tournament moves through Discovery, Elimination and Head-to-head purely
//! as a function of the round counter; nothing else triggers a transition.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::planner::RoundBudget;

/// Tournament phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Discovery,
    Elimination,
    HeadToHead,
}

impl Phase {
    /// 1-based phase number
    pub fn number(&self) -> u8 {
        match self {
            Phase::Discovery => 1,
            Phase::Elimination => 2,
            Phase::HeadToHead => 3,
        }
    }

    /// Message shown to the person making decisions
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Discovery => "Discovery Phase - Exploring All Songs",
            Phase::Elimination => "Elimination Round - The Competition Heats Up",
            Phase::HeadToHead => "Final Showdown - Crown Your Champions",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phase::Discovery => "every song gets heard and wins are counted",
            Phase::Elimination => "top contenders compete for a finalist spot",
            Phase::HeadToHead => "finalists are ranked by head-to-head record",
        }
    }

    /// Whether decisions are scored as head-to-head records
    pub fn is_head_to_head(&self) -> bool {
        matches!(self, Phase::HeadToHead)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Discovery => f.write_str("discovery"),
            Phase::Elimination => f.write_str("elimination"),
            Phase::HeadToHead => f.write_str("head-to-head"),
        }
    }
}

/// Where a round sits within its phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseContext {
    pub phase: Phase,
    /// 1-based round index within the phase
    pub phase_round: usize,
    /// Rounds in this phase
    pub max_phase_rounds: usize,
}

impl PhaseContext {
    pub fn label(&self) -> &'static str {
        self.phase.label()
    }

    pub fn is_last_round(&self) -> bool {
        self.phase_round == self.max_phase_rounds
    }

    /// Progress through the phase in percent, counting this round as done
    pub fn progress_percent(&self) -> f64 {
        if self.max_phase_rounds == 0 {
            return 100.0;
        }
        self.phase_round as f64 / self.max_phase_rounds as f64 * 100.0
    }
}

/// Classify a 1-based round number against the budget.
///
/// Returns `None` for round 0 and for any round past `total_rounds`.
pub fn classify(round: usize, budget: &RoundBudget) -> Option<PhaseContext> {
    if round == 0 || round > budget.total_rounds {
        return None;
    }

    let context = if round <= budget.phase1_end() {
        PhaseContext {
            phase: Phase::Discovery,
            phase_round: round,
            max_phase_rounds: budget.phase1_rounds,
        }
    } else if round <= budget.phase2_end() {
        PhaseContext {
            phase: Phase::Elimination,
            phase_round: round - budget.phase1_end(),
            max_phase_rounds: budget.phase2_rounds,
        }
    } else {
        PhaseContext {
            phase: Phase::HeadToHead,
            phase_round: round - budget.phase2_end(),
            max_phase_rounds: budget.phase3_rounds,
        }
    };

    Some(context)
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod phase_tests;
