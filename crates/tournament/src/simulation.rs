//! Simulated listener for unattended tournaments
//!
//! The listener has a hidden preference order: songs earlier in the catalog
//! are liked more, optionally blurred by seeded noise. Every round it picks
//! the candidate it likes most. Comparing the final standings with the hidden
//! order shows how much of the listener's taste the tournament recovers.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sorter_core::{
    EliminationReport, Item, ItemId, RankingEntry, RoundBudget, SorterConfig, Tournament,
    TournamentStats,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Configuration for a simulated run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Seed for both the tournament and the listener (None = entropy)
    pub seed: Option<u64>,
    /// Preference noise as a fraction of the catalog size (0 = strict catalog order)
    pub noise: f64,
    /// Size of the leading group compared against the hidden order
    pub top_k: usize,
    /// Engine tuning
    pub sorter: SorterConfig,
    /// Print phase results during the run
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise: 0.0,
            top_k: 10,
            sorter: SorterConfig::default(),
            verbose: true,
        }
    }
}

/// Outcome of one simulated tournament
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub rounds_played: usize,
    pub budget: RoundBudget,
    pub stats: TournamentStats,
    /// Whole-catalog standings at the end of the run
    pub standings: Vec<RankingEntry>,
    /// Phase cuts in the order they happened
    pub eliminations: Vec<EliminationReport>,
    /// Catalog ids ordered by hidden preference, best first
    pub preference_order: Vec<ItemId>,
    pub top_k: usize,
    /// Songs present in both the standings' top k and the hidden top k
    pub top_k_overlap: usize,
}

impl SimulationResult {
    /// Share of the hidden top k found in the standings' top k
    pub fn recovery(&self) -> f64 {
        if self.top_k == 0 {
            return 0.0;
        }
        self.top_k_overlap as f64 / self.top_k as f64
    }

    /// Position of the hidden favourite in the standings
    pub fn favourite_rank(&self) -> Option<usize> {
        let favourite = self.preference_order.first()?;
        self.standings
            .iter()
            .find(|entry| entry.item.id == *favourite)
            .map(|entry| entry.rank)
    }
}

/// Plays whole tournaments with a simulated listener
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one tournament over `items` to completion
    pub fn run(&self, items: Vec<Item>) -> Result<SimulationResult> {
        let (tournament_rng, mut listener_rng) = match self.config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let strengths = self.preference_strengths(&items, &mut listener_rng);
        let mut preference_order: Vec<ItemId> = items.iter().map(|item| item.id.clone()).collect();
        preference_order.sort_by(|a, b| {
            let (sa, sb) = (strengths[a], strengths[b]);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut tournament = Tournament::with_config(items, self.config.sorter.clone(), tournament_rng)
            .context("Failed to start tournament")?;
        let budget = *tournament.budget();
        info!(
            total_rounds = budget.total_rounds,
            noise = self.config.noise,
            "simulation started"
        );

        let mut eliminations = Vec::new();
        while let Some(round) = tournament.current_round() {
            let winner = preferred(&round.candidates, &strengths)
                .context("Round had no candidates")?;
            debug!(round = round.round_number, %winner, "listener chose");

            let outcome = tournament
                .report_decision(&winner)
                .context("Listener picked a song that was not on offer")?;

            if let Some(report) = outcome.elimination {
                if self.config.verbose {
                    println!(
                        "Round {}/{}: {} closed - {} eliminated, {} remain",
                        outcome.round,
                        budget.total_rounds,
                        report.phase,
                        report.eliminated.len(),
                        report.survivors
                    );
                }
                eliminations.push(report);
            }
        }

        let standings = tournament.final_standings();
        let top_k = self.config.top_k.min(standings.len());
        let top_k_overlap = overlap(&standings, &preference_order, top_k);

        info!(top_k, top_k_overlap, "simulation finished");

        Ok(SimulationResult {
            rounds_played: tournament.rounds_played(),
            budget,
            stats: tournament.stats(),
            standings,
            eliminations,
            preference_order,
            top_k,
            top_k_overlap,
        })
    }

    /// Hidden strength per song: reverse catalog position plus noise
    fn preference_strengths<R: Rng>(&self, items: &[Item], rng: &mut R) -> HashMap<ItemId, f64> {
        let n = items.len() as f64;
        let spread = self.config.noise.max(0.0) * n;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let base = n - index as f64;
                let jitter = if spread > 0.0 {
                    rng.gen::<f64>() * spread
                } else {
                    0.0
                };
                (item.id.clone(), base + jitter)
            })
            .collect()
    }
}

/// The candidate with the highest hidden strength; earlier candidates win ties
fn preferred(candidates: &[Item], strengths: &HashMap<ItemId, f64>) -> Option<ItemId> {
    let strength = |item: &Item| strengths.get(&item.id).copied().unwrap_or(f64::MIN);

    let mut best: Option<&Item> = None;
    for candidate in candidates {
        match best {
            Some(current) if strength(current) >= strength(candidate) => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|item| item.id.clone())
}

fn overlap(standings: &[RankingEntry], preference_order: &[ItemId], k: usize) -> usize {
    let expected: HashSet<&ItemId> = preference_order.iter().take(k).collect();
    standings
        .iter()
        .take(k)
        .filter(|entry| expected.contains(&entry.item.id))
        .count()
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod simulation_tests;
