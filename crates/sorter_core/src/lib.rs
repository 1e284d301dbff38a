//! Song Sorter tournament engine
//!
//! This crate ranks a catalog of items purely from repeated
//! "pick your favorite of three" decisions:
//! - Discovery: every item is shown a minimum number of times and wins accumulate
//! - Elimination: the field is cut down to a small finalist set
//! - Head-to-head: finalists are ranked by their pairwise win rate
//!
//! # Usage
//!
//! ```no_run
//! use sorter_core::{Item, Tournament};
//!
//! let items = (1..=30).map(|i| Item::new(format!("song-{i}"))).collect();
//! let mut tournament = Tournament::initialize(items)?;
//!
//! while let Some(round) = tournament.current_round() {
//!     let pick = round.candidates[0].id.clone();
//!     tournament.report_decision(&pick)?;
//! }
//!
//! for entry in tournament.rankings() {
//!     println!("{:>3}. {}", entry.rank, entry.item.id);
//! }
//! # Ok::<(), sorter_core::SorterError>(())
//! ```

pub mod config;
pub mod controller;
pub mod elimination;
pub mod error;
pub mod phase;
pub mod planner;
pub mod ranking;
pub mod sampler;
pub mod scoring;
pub mod selection;
pub mod types;

pub use config::*;
pub use controller::*;
pub use elimination::*;
pub use error::*;
pub use phase::*;
pub use planner::*;
pub use ranking::*;
pub use sampler::*;
pub use scoring::*;
pub use selection::*;
pub use types::*;

/// Number of candidates presented in every round.
pub const CANDIDATES_PER_ROUND: usize = 3;
