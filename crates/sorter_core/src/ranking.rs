//! Ranking views
//!
//! Rankings are computed on demand from item state and never mutate it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::Item;

/// Value an item is ranked by
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RankMetric {
    /// Cumulative wins from discovery and elimination
    Score { score: u32 },
    /// Head-to-head record from the final phase
    WinRate {
        win_rate: f64,
        wins: u32,
        losses: u32,
        matches: u32,
    },
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position
    pub rank: usize,
    pub item: Item,
    pub metric: RankMetric,
}

/// Rank items for the given context.
///
/// Head-to-head rankings cover active finalists only. Score rankings list
/// active items and, once `complete`, eliminated items after them. The
/// controller always ranks a finished tournament head-to-head, so the
/// score-plus-eliminated view only comes from callers ranking item lists
/// directly; use `final_standings` for the whole catalog after a run.
pub fn rank_items(
    items: &[Item],
    head_to_head: bool,
    complete: bool,
    tolerance: f64,
) -> Vec<RankingEntry> {
    if head_to_head {
        let finalists: Vec<&Item> = items.iter().filter(|item| item.is_active()).collect();
        return number(head_to_head_order(finalists, tolerance), win_rate_metric);
    }

    let mut ordered = by_score(items.iter().filter(|item| item.is_active()));
    if complete {
        ordered.extend(by_score(items.iter().filter(|item| item.eliminated)));
    }
    number(ordered, score_metric)
}

/// Total ranking of the whole catalog: finalists by head-to-head record,
/// then everyone else by score.
pub fn final_standings(items: &[Item], tolerance: f64) -> Vec<RankingEntry> {
    let finalists: Vec<&Item> = items.iter().filter(|item| item.is_active()).collect();
    let mut entries = number(head_to_head_order(finalists, tolerance), win_rate_metric);

    let offset = entries.len();
    let rest = number(by_score(items.iter().filter(|item| item.eliminated)), score_metric);
    entries.extend(rest.into_iter().map(|mut entry| {
        entry.rank += offset;
        entry
    }));
    entries
}

/// Compare two finalists: win rate, then matches played, then legacy score.
///
/// Win rates within `tolerance` of each other count as tied, which makes this
/// comparison non-transitive.
pub fn compare_head_to_head(a: &Item, b: &Item, tolerance: f64) -> Ordering {
    let (rate_a, rate_b) = (a.h2h.win_rate(), b.h2h.win_rate());
    if (rate_a - rate_b).abs() > tolerance {
        return rate_b.partial_cmp(&rate_a).unwrap_or(Ordering::Equal);
    }
    b.h2h
        .matches
        .cmp(&a.h2h.matches)
        .then_with(|| b.score.cmp(&a.score))
}

/// Stable insertion sort; `sort_by` requires a total order, the tolerance
/// comparison is not one
fn head_to_head_order(mut finalists: Vec<&Item>, tolerance: f64) -> Vec<&Item> {
    for i in 1..finalists.len() {
        let mut j = i;
        while j > 0 && compare_head_to_head(finalists[j - 1], finalists[j], tolerance) == Ordering::Greater {
            finalists.swap(j - 1, j);
            j -= 1;
        }
    }
    finalists
}

fn by_score<'a>(items: impl Iterator<Item = &'a Item>) -> Vec<&'a Item> {
    let mut ordered: Vec<&Item> = items.collect();
    ordered.sort_by(|a, b| b.score.cmp(&a.score));
    ordered
}

fn number(ordered: Vec<&Item>, metric: fn(&Item) -> RankMetric) -> Vec<RankingEntry> {
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, item)| RankingEntry {
            rank: index + 1,
            item: item.clone(),
            metric: metric(item),
        })
        .collect()
}

fn score_metric(item: &Item) -> RankMetric {
    RankMetric::Score { score: item.score }
}

fn win_rate_metric(item: &Item) -> RankMetric {
    RankMetric::WinRate {
        win_rate: item.h2h.win_rate(),
        wins: item.h2h.wins,
        losses: item.h2h.losses,
        matches: item.h2h.matches,
    }
}

#[cfg(test)]
#[path = "ranking_tests.rs"]
mod ranking_tests;
