//! Decision scoring
//!
//! Discovery and elimination count round wins. Head-to-head keeps a
//! pairwise record instead: picking one of three beats both others.

use crate::error::{Result, SorterError};
use crate::phase::Phase;
use crate::types::{Item, ItemId};

/// Apply the outcome of one round to the participating items.
///
/// `candidates` are indices into `items` exactly as presented in the round.
/// Nothing is mutated when `winner` is not one of them. Returns the index of
/// the winning item.
pub fn apply_decision(
    items: &mut [Item],
    candidates: &[usize],
    winner: &ItemId,
    phase: Phase,
    round: usize,
) -> Result<usize> {
    let winner_index = candidates
        .iter()
        .copied()
        .find(|&i| items[i].id == *winner)
        .ok_or_else(|| SorterError::InvalidSelection {
            winner: winner.clone(),
            round,
        })?;

    if phase.is_head_to_head() {
        let losers = (candidates.len() - 1) as u32;
        for &index in candidates {
            let record = &mut items[index].h2h;
            if index == winner_index {
                record.wins += losers;
                record.score += 1;
            } else {
                record.losses += 1;
            }
            record.matches += 1;
        }
    } else {
        items[winner_index].score += 1;
    }

    Ok(winner_index)
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod scoring_tests;
