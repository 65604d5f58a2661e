use serde::Serialize;

use super::{PotionCount, Score};
use crate::systems::errors::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YieldBand {
    pub label: String,
    /// Lowest score that still lands in this band.
    pub threshold: Score,
    pub count: PotionCount,
}

/// Score thresholds in descending order, each with the potions it yields, plus
/// the count for scores below every threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YieldTable {
    bands: Vec<YieldBand>,
    floor_label: String,
    floor: PotionCount,
}

impl YieldTable {
    pub fn new(
        bands: Vec<YieldBand>,
        floor_label: impl Into<String>,
        floor: PotionCount,
    ) -> Result<Self, ConfigError> {
        for pair in bands.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if upper.threshold <= lower.threshold {
                return Err(invalid(format!(
                    "threshold {} of {} must exceed {} of {}",
                    upper.threshold, upper.label, lower.threshold, lower.label
                )));
            }
            if upper.count < lower.count {
                return Err(invalid(format!(
                    "band {} yields fewer potions than {}",
                    upper.label, lower.label
                )));
            }
        }
        if let Some(last) = bands.last() {
            if last.count < floor {
                return Err(invalid(format!(
                    "floor yields more potions than band {}",
                    last.label
                )));
            }
        }
        Ok(Self {
            bands,
            floor_label: floor_label.into(),
            floor,
        })
    }

    /// Skips ordering checks; the rule pack already validated offsets and penalties.
    pub(super) fn assemble(bands: Vec<YieldBand>, floor_label: String, floor: PotionCount) -> Self {
        Self {
            bands,
            floor_label,
            floor,
        }
    }

    pub fn bands(&self) -> &[YieldBand] {
        &self.bands
    }

    pub fn floor(&self) -> PotionCount {
        self.floor
    }

    pub fn floor_label(&self) -> &str {
        &self.floor_label
    }

    /// Best possible yield.
    pub fn cap(&self) -> PotionCount {
        self.bands.first().map_or(self.floor, |band| band.count)
    }

    /// Index of the band `score` falls in; `bands().len()` stands for the floor.
    pub fn band_index(&self, score: Score) -> usize {
        self.bands
            .iter()
            .position(|band| score >= band.threshold)
            .unwrap_or(self.bands.len())
    }

    pub fn yield_for(&self, score: Score) -> PotionCount {
        self.bands
            .get(self.band_index(score))
            .map_or(self.floor, |band| band.count)
    }

    /// Band labels followed by the floor label, in the order of `band_index`.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|band| band.label.as_str())
            .chain(std::iter::once(self.floor_label.as_str()))
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid {
        section: "yield",
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(label: &str, threshold: i64, count: u32) -> YieldBand {
        YieldBand {
            label: label.into(),
            threshold: Score(threshold),
            count: PotionCount(count),
        }
    }

    #[test]
    fn maps_scores_to_first_matching_band() {
        let table = YieldTable::new(
            vec![band("MAX", 400, 3), band("MAX-1", 300, 2)],
            "FLOOR",
            PotionCount(1),
        )
        .unwrap();
        assert_eq!(table.yield_for(Score(400)), PotionCount(3));
        assert_eq!(table.yield_for(Score(399)), PotionCount(2));
        assert_eq!(table.yield_for(Score(300)), PotionCount(2));
        assert_eq!(table.yield_for(Score(299)), PotionCount(1));
        assert_eq!(table.yield_for(Score(-40)), PotionCount(1));
        assert_eq!(table.band_index(Score(-40)), 2);
        assert_eq!(table.cap(), PotionCount(3));
        assert_eq!(
            table.labels().collect::<Vec<_>>(),
            vec!["MAX", "MAX-1", "FLOOR"]
        );
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let err = YieldTable::new(
            vec![band("A", 300, 3), band("B", 300, 2)],
            "F",
            PotionCount(0),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must exceed"), "{err}");
    }

    #[test]
    fn rejects_counts_rising_with_lower_scores() {
        assert!(YieldTable::new(
            vec![band("A", 400, 2), band("B", 300, 3)],
            "F",
            PotionCount(0)
        )
        .is_err());
        assert!(YieldTable::new(vec![band("A", 400, 2)], "F", PotionCount(5)).is_err());
    }

    #[test]
    fn empty_table_is_all_floor() {
        let table = YieldTable::new(Vec::new(), "F", PotionCount(4)).unwrap();
        assert_eq!(table.yield_for(Score(i64::MAX)), PotionCount(4));
        assert_eq!(table.cap(), PotionCount(4));
    }
}
