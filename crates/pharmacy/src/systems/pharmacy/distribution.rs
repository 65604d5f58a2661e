use std::collections::BTreeMap;

use serde::Serialize;

use super::attributes::AttributeSet;
use super::formula::{evaluate, score, ScoreRange};
use super::yield_table::YieldTable;
use super::{PotionCount, Score};
use crate::systems::catalog::Recipe;

pub const BP_SCALE: u64 = 10_000;
pub const CENTI_SCALE: u64 = 100;

/// Every score a recipe can produce for one character, weighted by how many
/// (skill roll, protection roll) pairs reach it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutcomeDistribution {
    range: ScoreRange,
    histogram: BTreeMap<Score, u64>,
    total: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BandShare {
    pub label: String,
    pub count: PotionCount,
    pub combos: u64,
    pub share_bp: u64,
}

impl OutcomeDistribution {
    pub fn enumerate(attrs: &AttributeSet, recipe: &Recipe) -> Self {
        let formula = &recipe.formula;
        let mut histogram = BTreeMap::new();
        let mut total = 0u64;
        for skill_roll in formula.skill_roll.values() {
            for protection_roll in formula.protection_roll.values() {
                let value = score(attrs, formula, skill_roll, protection_roll);
                *histogram.entry(value).or_insert(0u64) += 1;
                total += 1;
            }
        }
        Self {
            range: evaluate(attrs, recipe),
            histogram,
            total,
        }
    }

    pub fn range(&self) -> ScoreRange {
        self.range
    }

    pub fn min(&self) -> Score {
        self.range.min
    }

    pub fn max(&self) -> Score {
        self.range.max
    }

    /// Number of roll combinations enumerated.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Distinct scores in ascending order with their combination counts.
    pub fn histogram(&self) -> impl Iterator<Item = (Score, u64)> + '_ {
        self.histogram.iter().map(|(score, combos)| (*score, *combos))
    }

    /// Combinations per yield band, floor last. Shares are basis points of the
    /// total, rounded down, so they may sum to slightly under `10_000`.
    pub fn band_breakdown(&self, table: &YieldTable) -> Vec<BandShare> {
        let mut combos = vec![0u64; table.bands().len() + 1];
        for (score, count) in &self.histogram {
            combos[table.band_index(*score)] += count;
        }
        let counts = table
            .bands()
            .iter()
            .map(|band| band.count)
            .chain(std::iter::once(table.floor()));
        table
            .labels()
            .zip(counts)
            .zip(combos)
            .map(|((label, count), combos)| BandShare {
                label: label.to_string(),
                count,
                combos,
                share_bp: self.share_bp(combos),
            })
            .collect()
    }

    /// Probability-weighted mean yield in hundredths of a potion, rounded down.
    pub fn expected_yield_centi(&self, table: &YieldTable) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let weighted: u64 = self
            .histogram
            .iter()
            .map(|(score, combos)| combos * u64::from(table.yield_for(*score).0))
            .sum();
        weighted * CENTI_SCALE / self.total
    }

    fn share_bp(&self, combos: u64) -> u64 {
        if self.total == 0 {
            0
        } else {
            combos * BP_SCALE / self.total
        }
    }
}
