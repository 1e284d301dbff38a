//! Song sorter driver
//!
//! This crate provides infrastructure for:
//! - Loading song catalogs and filtering them by streaming provider
//! - Playing tournaments unattended with a simulated listener
//! - Generating and storing results reports
//!
//! # Usage
//!
//! ```bash
//! # Show the round budget for a 120-song catalog
//! cargo run -p tournament -- plan 120
//!
//! # Rank a catalog interactively
//! cargo run -p tournament -- --provider spotify play --catalog songs.json
//!
//! # Measure how well a tournament recovers a known order
//! cargo run -p tournament -- simulate --catalog songs.json --seed 7 --noise 0.1
//! ```

mod catalog;
mod report;
mod simulation;

pub use catalog::*;
pub use report::*;
pub use simulation::*;
