//! Tournament controller
//!
//! Owns the item list, the round counter and the decision history. Each
//! round is a two-step exchange: `current_round` fixes and caches the
//! candidates, `report_decision` resolves them. A reported decision is
//! applied completely (score, history, round counter, elimination) or not
//! at all.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::SorterConfig;
use crate::elimination::{run_elimination, EliminationReport};
use crate::error::{Result, SorterError};
use crate::phase::{classify, Phase, PhaseContext};
use crate::planner::RoundBudget;
use crate::ranking::{final_standings, rank_items, RankingEntry};
use crate::scoring::apply_decision;
use crate::selection::SelectionEngine;
use crate::types::{HistoryEntry, Item, ItemId};

/// Where the tournament stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentState {
    Discovery,
    Elimination,
    HeadToHead,
    Complete,
}

impl From<Phase> for TournamentState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Discovery => TournamentState::Discovery,
            Phase::Elimination => TournamentState::Elimination,
            Phase::HeadToHead => TournamentState::HeadToHead,
        }
    }
}

/// Everything a front end needs to present one round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundView {
    /// 1-based round number over the whole tournament
    pub round_number: usize,
    pub total_rounds: usize,
    /// "Head-to-Head k" during the final phase, the round number otherwise
    pub round_label: String,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub phase_round: usize,
    pub phase_rounds: usize,
    pub phase_progress_percent: f64,
    /// Candidates in display order
    pub candidates: Vec<Item>,
    pub is_final_phase: bool,
}

/// Result of an accepted decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    /// Round that was resolved
    pub round: usize,
    pub phase: Phase,
    /// Present when the round closed a phase
    pub elimination: Option<EliminationReport>,
}

/// Exposure diagnostics over the active items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub average_appearances: f64,
    pub min_appearances: u32,
    pub max_appearances: u32,
    /// max - min appearances among active items
    pub fairness_spread: u32,
    pub total_decisions: usize,
    /// Pairwise preferences implied by the decisions (two per round)
    pub total_comparisons: usize,
    pub active_items: usize,
    pub eliminated_items: usize,
}

/// A single ranking tournament.
///
/// Instances are independent of each other; run one per session.
#[derive(Debug)]
pub struct Tournament<R = StdRng> {
    items: Vec<Item>,
    config: SorterConfig,
    budget: RoundBudget,
    current_round: usize,
    history: Vec<HistoryEntry>,
    /// Candidates shown for the round in progress
    pending: Option<Vec<usize>>,
    rng: R,
}

impl Tournament<StdRng> {
    /// Start a tournament with the default configuration and an entropy-seeded RNG
    pub fn initialize(items: Vec<Item>) -> Result<Self> {
        Self::with_config(items, SorterConfig::default(), StdRng::from_entropy())
    }
}

impl<R: Rng> Tournament<R> {
    /// Start a tournament with explicit configuration and random source
    pub fn with_config(items: Vec<Item>, config: SorterConfig, rng: R) -> Result<Self> {
        if items.is_empty() {
            return Err(SorterError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(items.len());
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(&item.id)) {
            return Err(SorterError::Config(format!(
                "Duplicate item id: {}",
                duplicate.id
            )));
        }

        let budget = RoundBudget::plan(items.len(), &config)?;
        let items: Vec<Item> = items.iter().map(Item::fresh).collect();

        info!(
            items = items.len(),
            total_rounds = budget.total_rounds,
            "tournament initialized"
        );

        Ok(Self {
            items,
            config,
            budget,
            current_round: 0,
            history: Vec::new(),
            pending: None,
            rng,
        })
    }

    /// Discard all progress and start over with the same catalog
    pub fn restart(&mut self) {
        for item in self.items.iter_mut() {
            *item = item.fresh();
        }
        self.current_round = 0;
        self.history.clear();
        self.pending = None;
        info!(items = self.items.len(), "tournament restarted");
    }

    /// The round awaiting a decision, or `None` once the tournament is over.
    ///
    /// The first call for a round picks the candidates and counts their
    /// appearances; later calls return the same candidates unchanged until a
    /// decision is reported.
    pub fn current_round(&mut self) -> Option<RoundView> {
        let context = self.phase_context()?;

        let candidates = match self.pending.clone() {
            Some(pending) => pending,
            None => {
                let engine = SelectionEngine::new(&self.items, &self.budget);
                let chosen = engine.select(&context, self.history.last(), &mut self.rng);
                for &index in &chosen {
                    self.items[index].record_appearance();
                }
                debug!(
                    round = self.current_round + 1,
                    phase = %context.phase,
                    candidates = ?chosen.iter().map(|&i| self.items[i].id.as_str()).collect::<Vec<_>>(),
                    "round prepared"
                );
                self.pending = Some(chosen.clone());
                chosen
            }
        };

        Some(self.round_view(&context, &candidates))
    }

    /// Resolve the pending round in favour of `winner`.
    ///
    /// Fails with `InvalidSelection`, leaving everything untouched, when no
    /// round is pending or `winner` is not one of its candidates.
    pub fn report_decision(&mut self, winner: &ItemId) -> Result<DecisionOutcome> {
        let round = self.current_round + 1;
        let invalid = || SorterError::InvalidSelection {
            winner: winner.clone(),
            round,
        };

        let context = self.phase_context().ok_or_else(invalid)?;
        let Some(candidates) = self.pending.as_ref() else {
            warn!(%winner, round, "decision reported with no round on display");
            return Err(invalid());
        };

        if let Err(err) = apply_decision(&mut self.items, candidates, winner, context.phase, round) {
            warn!(%winner, round, "decision rejected: not a candidate");
            return Err(err);
        }

        let candidates = self.pending.take().unwrap_or_default();
        self.history.push(HistoryEntry {
            round,
            candidates: candidates.iter().map(|&i| self.items[i].id.clone()).collect(),
            winner: winner.clone(),
            timestamp: Utc::now(),
        });
        self.current_round += 1;

        let elimination = run_elimination(&mut self.items, &context, &self.budget, &self.config);
        debug!(round, %winner, "decision recorded");

        Ok(DecisionOutcome {
            round,
            phase: context.phase,
            elimination,
        })
    }

    /// Ranking appropriate to the current phase; head-to-head once finished
    pub fn rankings(&self) -> Vec<RankingEntry> {
        let head_to_head = self.state() == TournamentState::HeadToHead || self.is_complete();
        rank_items(
            &self.items,
            head_to_head,
            self.is_complete(),
            self.config.win_rate_tolerance,
        )
    }

    /// Total ranking of the catalog: finalists first, then eliminated items by score
    pub fn final_standings(&self) -> Vec<RankingEntry> {
        final_standings(&self.items, self.config.win_rate_tolerance)
    }

    pub fn is_complete(&self) -> bool {
        self.current_round >= self.budget.total_rounds
    }

    pub fn state(&self) -> TournamentState {
        match self.phase_context() {
            Some(context) => context.phase.into(),
            None => TournamentState::Complete,
        }
    }

    /// Phase context of the next round to be played
    pub fn phase_context(&self) -> Option<PhaseContext> {
        classify(self.current_round + 1, &self.budget)
    }

    pub fn stats(&self) -> TournamentStats {
        let active: Vec<u32> = self
            .items
            .iter()
            .filter(|item| item.is_active())
            .map(|item| item.appearances)
            .collect();
        let min = active.iter().copied().min().unwrap_or(0);
        let max = active.iter().copied().max().unwrap_or(0);
        let average = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|&a| a as f64).sum::<f64>() / active.len() as f64
        };

        TournamentStats {
            average_appearances: average,
            min_appearances: min,
            max_appearances: max,
            fairness_spread: max - min,
            total_decisions: self.history.len(),
            total_comparisons: self.history.len() * 2,
            active_items: active.len(),
            eliminated_items: self.items.len() - active.len(),
        }
    }

    /// Completed rounds, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn budget(&self) -> &RoundBudget {
        &self.budget
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Number of completed rounds
    pub fn rounds_played(&self) -> usize {
        self.current_round
    }

    fn round_view(&self, context: &PhaseContext, candidates: &[usize]) -> RoundView {
        let round_number = self.current_round + 1;
        let round_label = if context.phase.is_head_to_head() {
            format!("Head-to-Head {}", context.phase_round)
        } else {
            round_number.to_string()
        };

        RoundView {
            round_number,
            total_rounds: self.budget.total_rounds,
            round_label,
            phase: context.phase,
            phase_label: context.label(),
            phase_round: context.phase_round,
            phase_rounds: context.max_phase_rounds,
            phase_progress_percent: context.progress_percent(),
            candidates: candidates.iter().map(|&i| self.items[i].clone()).collect(),
            is_final_phase: context.phase.is_head_to_head(),
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
