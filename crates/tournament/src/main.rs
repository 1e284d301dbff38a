//! Song sorter CLI
//!
//! Rank a song catalog by answering "which of these three do you prefer?"
//! rounds, or let a simulated listener play the tournament.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sorter_core::{Item, Provider, RoundBudget, RoundView, SorterConfig, Tournament};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tournament::{
    describe, filter_for_provider, load_catalog, SimulationConfig, SimulationRunner,
    TournamentReport,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sorter", version, about = "Multi-phase song ranking tournament")]
struct Cli {
    /// Engine tuning file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only keep songs playable on this provider (deezer, spotify)
    #[arg(long, global = true)]
    provider: Option<Provider>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the round budget for a catalog size
    Plan {
        /// Number of songs
        songs: usize,
    },
    /// Rank a catalog interactively
    Play {
        #[arg(long)]
        catalog: PathBuf,
        /// Save the final report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play a catalog with a simulated listener
    Simulate {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Preference noise as a fraction of the catalog size
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        /// Leading group compared against the listener's order
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        /// Save the final report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SorterConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SorterConfig::default(),
    };
    config.validate()?;

    match cli.command {
        Command::Plan { songs } => run_plan(songs, &config),
        Command::Play { catalog, output } => {
            let items = read_catalog(&catalog, cli.provider)?;
            run_play(items, config, output.as_deref())
        }
        Command::Simulate {
            catalog,
            seed,
            noise,
            top_k,
            output,
        } => {
            let items = read_catalog(&catalog, cli.provider)?;
            let sim = SimulationConfig {
                seed,
                noise,
                top_k,
                sorter: config,
                verbose: true,
            };
            run_simulate(items, sim, output.as_deref())
        }
    }
}

fn read_catalog(path: &Path, provider: Option<Provider>) -> Result<Vec<Item>> {
    let items = load_catalog(path)?;
    let items = match provider {
        Some(provider) => filter_for_provider(items, provider),
        None => items,
    };
    if items.is_empty() {
        bail!("No playable songs in {}", path.display());
    }
    Ok(items)
}

fn run_plan(songs: usize, config: &SorterConfig) -> Result<()> {
    let budget = RoundBudget::plan(songs, config)?;

    println!("=== Round budget for {} songs ===", songs);
    println!(
        "Discovery:    {:>4} rounds, {} appearances each, ~{} survivors",
        budget.phase1_rounds, budget.phase1_min_appearances, budget.phase1_survivors
    );
    println!(
        "Elimination:  {:>4} rounds, {} finalists",
        budget.phase2_rounds, budget.phase2_survivors
    );
    println!("Head-to-head: {:>4} rounds", budget.phase3_rounds);
    println!("Total:        {:>4} rounds", budget.total_rounds);
    Ok(())
}

fn run_play(items: Vec<Item>, config: SorterConfig, output: Option<&Path>) -> Result<()> {
    let mut tournament = Tournament::with_config(items, config, StdRng::from_entropy())
        .context("Failed to start tournament")?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(round) = tournament.current_round() {
        print_round(&round);

        let Some(choice) = prompt(&mut lines, round.candidates.len())? else {
            println!("Stopped after {} rounds.", tournament.rounds_played());
            break;
        };

        let winner = round.candidates[choice].id.clone();
        let outcome = tournament.report_decision(&winner)?;
        if let Some(report) = outcome.elimination {
            println!(
                "\n*** {} closed: {} songs eliminated, {} remain ***",
                report.phase,
                report.eliminated.len(),
                report.survivors
            );
        }
    }

    if tournament.is_complete() {
        info!(rounds = tournament.rounds_played(), "tournament complete");
    } else {
        println!("\nStandings so far:");
        for entry in tournament.rankings().iter().take(10) {
            println!(
                "{:>3}. {} ({})",
                entry.rank,
                entry.item.display_name(),
                describe(&entry.metric)
            );
        }
    }

    let report = TournamentReport::from_tournament("Interactive session", &tournament);
    report.print_report();
    if let Some(path) = output {
        report.save(path)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn run_simulate(items: Vec<Item>, sim: SimulationConfig, output: Option<&Path>) -> Result<()> {
    let (seed, noise) = (sim.seed, sim.noise);
    println!("=== Simulation: {} songs, noise {:.2} ===", items.len(), noise);

    let runner = SimulationRunner::new(sim);
    let result = runner.run(items)?;

    println!();
    println!("=== Final Result ===");
    println!(
        "Top {} recovery: {}/{} ({:.0}%)",
        result.top_k,
        result.top_k_overlap,
        result.top_k,
        result.recovery() * 100.0
    );
    if let Some(rank) = result.favourite_rank() {
        println!("Listener's favourite finished #{}", rank);
    }
    println!("Appearance spread: {}", result.stats.fairness_spread);

    let report = TournamentReport::from_simulation("Simulated listener", &result, seed, noise);
    report.print_report();
    if let Some(path) = output {
        report.save(path)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn print_round(round: &RoundView) {
    println!();
    if round.phase_round == 1 {
        println!("== {} ==", round.phase_label);
    }
    println!(
        "Round {} of {} ({:.0}% through this phase)",
        round.round_label, round.total_rounds, round.phase_progress_percent
    );
    for (index, item) in round.candidates.iter().enumerate() {
        println!("  [{}] {}", index + 1, item.display_name());
    }
}

/// Read a 0-based choice; `None` on quit or end of input
fn prompt<B: BufRead>(lines: &mut io::Lines<B>, choices: usize) -> Result<Option<usize>> {
    loop {
        print!("Your pick (1-{}, q to quit): ", choices);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("Failed to read input")?;
        let answer = line.trim();

        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("Please enter a number between 1 and {}", choices),
        }
    }
}
