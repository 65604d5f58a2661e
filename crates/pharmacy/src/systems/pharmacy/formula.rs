//! Advanced Pharmacy success score.
//!
//! ```text
//! score = INT + floor(DEX / divisor) + LUK + JOB
//!       + skill_roll
//!       + (BASE_LEVEL - pivot)
//!       + POTION_RESEARCH * weight
//!       + CHEMICAL_PROTECTION * protection_roll
//! ```
//!
//! All terms are integers. Low characters can drive the sum negative; that is a
//! valid score and simply lands below every yield threshold.

use serde::Serialize;

use super::attributes::AttributeSet;
use super::rng::DetRng;
use super::Score;
use crate::systems::catalog::Recipe;

/// Inclusive integer range of one random term. `min <= max` holds by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RollRange {
    min: i64,
    max: i64,
}

impl RollRange {
    pub fn new(min: i64, max: i64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(self) -> i64 {
        self.min
    }

    pub fn max(self) -> i64 {
        self.max
    }

    pub fn contains(self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of distinct values in the range.
    pub fn span(self) -> u64 {
        self.max.abs_diff(self.min).saturating_add(1)
    }

    pub fn values(self) -> impl Iterator<Item = i64> {
        self.min..=self.max
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormulaConstants {
    pub skill_roll: RollRange,
    pub protection_roll: RollRange,
    pub potion_research_weight: i64,
    pub base_level_pivot: i64,
    /// Always positive; checked when the rule pack loads.
    pub dex_divisor: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreRange {
    pub min: Score,
    pub max: Score,
}

impl ScoreRange {
    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

pub fn score(
    attrs: &AttributeSet,
    formula: &FormulaConstants,
    skill_roll: i64,
    protection_roll: i64,
) -> Score {
    let fixed = attrs.intelligence()
        + attrs.dexterity().div_euclid(formula.dex_divisor)
        + attrs.luck()
        + attrs.job_level()
        + (attrs.base_level() - formula.base_level_pivot)
        + attrs.potion_research() * formula.potion_research_weight;
    Score(fixed + skill_roll + attrs.chemical_protection() * protection_roll)
}

/// Lowest and highest score: both rolls at their minima, then both at their maxima.
pub fn score_range(attrs: &AttributeSet, formula: &FormulaConstants) -> ScoreRange {
    ScoreRange {
        min: score(
            attrs,
            formula,
            formula.skill_roll.min(),
            formula.protection_roll.min(),
        ),
        max: score(
            attrs,
            formula,
            formula.skill_roll.max(),
            formula.protection_roll.max(),
        ),
    }
}

pub fn evaluate(attrs: &AttributeSet, recipe: &Recipe) -> ScoreRange {
    score_range(attrs, &recipe.formula)
}

/// One simulated attempt; the two rolls are drawn independently.
pub fn sample(attrs: &AttributeSet, recipe: &Recipe, rng: &mut DetRng) -> Score {
    let formula = &recipe.formula;
    let skill_roll = rng.roll(formula.skill_roll);
    let protection_roll = rng.roll(formula.protection_roll);
    score(attrs, formula, skill_roll, protection_roll)
}
