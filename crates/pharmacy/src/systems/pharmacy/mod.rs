pub mod attributes;
pub mod buffs;
pub mod distribution;
pub mod formula;
pub mod rng;
pub mod rulepack;
pub mod types;
pub mod yield_table;

pub use attributes::{parse_field, AttributeInput, AttributeLimits, AttributeSet, Limit, RawAttributes};
pub use buffs::{BuffCatalog, BuffDef};
pub use distribution::{BandShare, OutcomeDistribution};
pub use formula::{evaluate, sample, score, score_range, FormulaConstants, RollRange, ScoreRange};
pub use rng::DetRng;
pub use rulepack::{load_rulepack, LevelRule, PharmacyRules, Rulepack};
pub use types::{PotionCount, Score, SkillLevel, Stat, StatLine};
pub use yield_table::{YieldBand, YieldTable};

#[cfg(test)]
mod tests;
