//! Tournament report storage and formatting

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sorter_core::{RankMetric, RankingEntry, RoundBudget, Tournament, TournamentStats};
use std::path::Path;

use crate::simulation::SimulationResult;

/// Final results of one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Name/description of the run
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub catalog_size: usize,
    pub budget: RoundBudget,
    pub stats: TournamentStats,
    /// Whole-catalog standings, best first
    pub standings: Vec<RankingEntry>,
    /// Present for simulated runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<Recovery>,
}

/// How well a simulated run recovered the listener's hidden order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    pub seed: Option<u64>,
    pub noise: f64,
    pub top_k: usize,
    pub top_k_overlap: usize,
}

impl TournamentReport {
    /// Snapshot a tournament, finished or not
    pub fn from_tournament<R: Rng>(name: &str, tournament: &Tournament<R>) -> Self {
        Self {
            name: name.to_string(),
            created_at: Utc::now(),
            catalog_size: tournament.items().len(),
            budget: *tournament.budget(),
            stats: tournament.stats(),
            standings: tournament.final_standings(),
            recovery: None,
        }
    }

    pub fn from_simulation(name: &str, result: &SimulationResult, seed: Option<u64>, noise: f64) -> Self {
        Self {
            name: name.to_string(),
            created_at: Utc::now(),
            catalog_size: result.standings.len(),
            budget: result.budget,
            stats: result.stats.clone(),
            standings: result.standings.clone(),
            recovery: Some(Recovery {
                seed,
                noise,
                top_k: result.top_k,
                top_k_overlap: result.top_k_overlap,
            }),
        }
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse report {}", path.display()))
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Catalog: {} songs, {} rounds ({} discovery / {} elimination / {} head-to-head)\n",
            self.catalog_size,
            self.budget.total_rounds,
            self.budget.phase1_rounds,
            self.budget.phase2_rounds,
            self.budget.phase3_rounds
        ));
        report.push_str(&format!(
            "Decisions: {}, appearances {}-{} (avg {:.1})\n",
            self.stats.total_decisions,
            self.stats.min_appearances,
            self.stats.max_appearances,
            self.stats.average_appearances
        ));
        if let Some(recovery) = &self.recovery {
            report.push_str(&format!(
                "Recovered {}/{} of the listener's top {}\n",
                recovery.top_k_overlap, recovery.top_k, recovery.top_k
            ));
        }
        report.push('\n');

        report.push_str("Standings:\n");
        report.push_str(&format!("{:>4}  {:<40} {:>12}\n", "Rank", "Song", "Result"));
        report.push_str(&"-".repeat(60));
        report.push('\n');

        for entry in &self.standings {
            report.push_str(&format!(
                "{:>4}  {:<40} {:>12}\n",
                entry.rank,
                truncate(entry.item.display_name(), 40),
                describe(&entry.metric)
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

/// Short result column for a ranking metric
pub fn describe(metric: &RankMetric) -> String {
    match metric {
        RankMetric::Score { score } => format!("{} pts", score),
        RankMetric::WinRate {
            win_rate, wins, losses, ..
        } => format!("{:.0}% {}-{}", win_rate * 100.0, wins, losses),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
