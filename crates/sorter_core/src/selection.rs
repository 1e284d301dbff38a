//! Candidate selection
//!
//! Picks the items shown in the next round. The engine holds no state of its
//! own: it reads the item list and the previous round from the controller and
//! returns indices into the item list.
//!
//! Every phase starts from the same fairness rule: items that have not yet
//! reached the phase's exposure target are shown first, least-exposed first.
//! Only when everyone has met the target does a phase apply its own
//! preference (flat exposure for discovery and elimination, score tiers for
//! head-to-head).

use rand::Rng;
use tracing::debug;

use crate::phase::{Phase, PhaseContext};
use crate::planner::RoundBudget;
use crate::sampler::{shuffle_candidates, weighted_sample};
use crate::types::{HistoryEntry, Item};
use crate::CANDIDATES_PER_ROUND;

/// Which appearance count a phase balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    /// Appearances over the whole tournament
    Overall,
    /// Appearances since the current phase began
    PhaseLocal,
}

impl Exposure {
    pub fn of(&self, item: &Item) -> u32 {
        match self {
            Exposure::Overall => item.appearances,
            Exposure::PhaseLocal => item.phase_appearances,
        }
    }
}

/// Phase-aware candidate picker over a borrowed item list
pub struct SelectionEngine<'a> {
    items: &'a [Item],
    budget: &'a RoundBudget,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(items: &'a [Item], budget: &'a RoundBudget) -> Self {
        Self { items, budget }
    }

    /// Choose the candidates for the round described by `context`.
    ///
    /// Returns up to `CANDIDATES_PER_ROUND` distinct indices of active items,
    /// fewer only when fewer items are active.
    pub fn select<R: Rng + ?Sized>(
        &self,
        context: &PhaseContext,
        previous: Option<&HistoryEntry>,
        rng: &mut R,
    ) -> Vec<usize> {
        let active: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.items[i].is_active())
            .collect();

        let mut selected = match context.phase {
            Phase::Discovery => self.select_discovery(&active, rng),
            Phase::Elimination => self.select_elimination(&active, context, rng),
            Phase::HeadToHead => self.select_head_to_head(&active, context, rng),
        };

        let wanted = CANDIDATES_PER_ROUND.min(active.len());
        if selected.len() < wanted {
            debug!(
                picked = selected.len(),
                wanted, "sampling exhausted, filling in catalog order"
            );
            for &index in &active {
                if selected.len() >= wanted {
                    break;
                }
                if !selected.contains(&index) {
                    selected.push(index);
                }
            }
        }
        selected.truncate(CANDIDATES_PER_ROUND);

        if let Some(previous) = previous {
            if self.repeats_a_slot(&selected, previous) {
                debug!("shuffling candidates to avoid a repeated slot");
                shuffle_candidates(&mut selected, rng);
            }
        }

        selected
    }

    fn select_discovery<R: Rng + ?Sized>(&self, active: &[usize], rng: &mut R) -> Vec<usize> {
        let minimum = self.budget.phase1_min_appearances;
        self.select_balanced(active, Exposure::Overall, minimum, rng)
    }

    fn select_elimination<R: Rng + ?Sized>(
        &self,
        active: &[usize],
        context: &PhaseContext,
        rng: &mut R,
    ) -> Vec<usize> {
        let minimum = phase_minimum(context, active.len(), 1);
        self.select_balanced(active, Exposure::PhaseLocal, minimum, rng)
    }

    /// Under-target items first, then keep exposure flat
    fn select_balanced<R: Rng + ?Sized>(
        &self,
        active: &[usize],
        exposure: Exposure,
        minimum: u32,
        rng: &mut R,
    ) -> Vec<usize> {
        let (under, rest) = self.split_by_target(active, exposure, minimum);

        if under.len() >= CANDIDATES_PER_ROUND {
            return self.draw_least_exposed(&under, exposure, CANDIDATES_PER_ROUND, rng);
        }

        if !under.is_empty() {
            let mut selected = under;
            let weights: Vec<f64> = rest
                .iter()
                .map(|&i| 1.0 / (self.items[i].appearances as f64 + 1.0))
                .collect();
            let needed = CANDIDATES_PER_ROUND - selected.len();
            selected.extend(weighted_sample(&weights, needed, rng).into_iter().map(|p| rest[p]));
            return selected;
        }

        let weights = self.flattening_weights(active, exposure, 2.0);
        weighted_sample(&weights, CANDIDATES_PER_ROUND, rng)
            .into_iter()
            .map(|p| active[p])
            .collect()
    }

    fn select_head_to_head<R: Rng + ?Sized>(
        &self,
        active: &[usize],
        context: &PhaseContext,
        rng: &mut R,
    ) -> Vec<usize> {
        if active.len() <= CANDIDATES_PER_ROUND {
            return active.to_vec();
        }

        let minimum = phase_minimum(context, active.len(), 2);
        let (under, rest) = self.split_by_target(active, Exposure::PhaseLocal, minimum);

        if under.len() >= CANDIDATES_PER_ROUND {
            return self.draw_least_exposed(&under, Exposure::PhaseLocal, CANDIDATES_PER_ROUND, rng);
        }

        if !under.is_empty() {
            let mut selected = under;
            let ranked = self.sorted_by_score(&rest);
            let weights: Vec<f64> = ranked
                .iter()
                .enumerate()
                .map(|(position, &i)| {
                    let rank_weight = (ranked.len() - position).max(1) as f64;
                    rank_weight / (self.items[i].appearances as f64 + 1.0)
                })
                .collect();
            let needed = CANDIDATES_PER_ROUND - selected.len();
            selected.extend(weighted_sample(&weights, needed, rng).into_iter().map(|p| ranked[p]));
            return selected;
        }

        self.select_by_tiers(active, rng)
    }

    /// One pick each from the top and middle score tiers, one from the rest.
    ///
    /// Within a tier, finalists shown less often in this phase are favoured.
    fn select_by_tiers<R: Rng + ?Sized>(&self, active: &[usize], rng: &mut R) -> Vec<usize> {
        let ranked = self.sorted_by_score(active);
        let top_end = ranked.len().div_ceil(3);
        let mid_end = (ranked.len() * 2).div_ceil(3);
        let top = &ranked[..top_end];
        let mid = &ranked[top_end..mid_end];

        let mut selected = Vec::with_capacity(CANDIDATES_PER_ROUND);

        let weights = self.flattening_weights(top, Exposure::PhaseLocal, 2.0);
        if let Some(&p) = weighted_sample(&weights, 1, rng).first() {
            selected.push(top[p]);
        }

        if !mid.is_empty() {
            let weights = self.flattening_weights(mid, Exposure::PhaseLocal, 1.5);
            if let Some(&p) = weighted_sample(&weights, 1, rng).first() {
                selected.push(mid[p]);
            }
        }

        let remaining: Vec<usize> = ranked
            .iter()
            .copied()
            .filter(|i| !selected.contains(i))
            .collect();
        let weights: Vec<f64> = remaining
            .iter()
            .map(|&i| 1.0 / (self.items[i].phase_appearances as f64 + 1.0))
            .collect();
        let needed = CANDIDATES_PER_ROUND.saturating_sub(selected.len());
        selected.extend(
            weighted_sample(&weights, needed, rng)
                .into_iter()
                .map(|p| remaining[p]),
        );

        selected
    }

    /// Partition into (below target, at or above target), keeping order
    fn split_by_target(
        &self,
        pool: &[usize],
        exposure: Exposure,
        minimum: u32,
    ) -> (Vec<usize>, Vec<usize>) {
        pool.iter()
            .copied()
            .partition(|&i| exposure.of(&self.items[i]) < minimum)
    }

    /// Draw `count` items, exhausting less-exposed tiers before touching the next
    fn draw_least_exposed<R: Rng + ?Sized>(
        &self,
        pool: &[usize],
        exposure: Exposure,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let mut ordered = pool.to_vec();
        ordered.sort_by_key(|&i| exposure.of(&self.items[i]));

        let mut selected = Vec::with_capacity(count);
        let mut start = 0;
        while selected.len() < count && start < ordered.len() {
            let level = exposure.of(&self.items[ordered[start]]);
            let end = ordered[start..]
                .iter()
                .position(|&i| exposure.of(&self.items[i]) != level)
                .map_or(ordered.len(), |offset| start + offset);
            let tier = &ordered[start..end];

            let weights = vec![1.0; tier.len()];
            let needed = count - selected.len();
            selected.extend(weighted_sample(&weights, needed, rng).into_iter().map(|p| tier[p]));
            start = end;
        }

        selected
    }

    /// `base^(max - own + 1)`: the further behind, the heavier
    fn flattening_weights(&self, pool: &[usize], exposure: Exposure, base: f64) -> Vec<f64> {
        let max = pool
            .iter()
            .map(|&i| exposure.of(&self.items[i]))
            .max()
            .unwrap_or(0);
        pool.iter()
            .map(|&i| base.powi((max - exposure.of(&self.items[i])) as i32 + 1))
            .collect()
    }

    fn sorted_by_score(&self, pool: &[usize]) -> Vec<usize> {
        let mut ranked = pool.to_vec();
        ranked.sort_by(|&a, &b| self.items[b].score.cmp(&self.items[a].score));
        ranked
    }

    fn repeats_a_slot(&self, selected: &[usize], previous: &HistoryEntry) -> bool {
        selected
            .iter()
            .zip(&previous.candidates)
            .any(|(&i, id)| self.items[i].id == *id)
    }
}

/// Phase-local exposure target: one below an even share of the phase's slots
fn phase_minimum(context: &PhaseContext, active: usize, floor: u32) -> u32 {
    if active == 0 {
        return floor;
    }
    let share = (context.max_phase_rounds * CANDIDATES_PER_ROUND / active) as u32;
    share.saturating_sub(1).max(floor)
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
