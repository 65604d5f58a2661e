use super::{recipe, reference_attrs};
use crate::systems::pharmacy::{OutcomeDistribution, PotionCount, Score, YieldBand, YieldTable};

fn absolute_table() -> YieldTable {
    YieldTable::new(
        vec![
            YieldBand {
                label: "TOP".into(),
                threshold: Score(400),
                count: PotionCount(3),
            },
            YieldBand {
                label: "MID".into(),
                threshold: Score(300),
                count: PotionCount(2),
            },
        ],
        "LOW",
        PotionCount(1),
    )
    .unwrap()
}

#[test]
fn enumerates_every_roll_pair() {
    let dist = OutcomeDistribution::enumerate(&reference_attrs(), &recipe(0));
    assert_eq!(dist.total(), 121 * 7);
    assert_eq!(dist.min(), Score(263));
    assert_eq!(dist.max(), Score(413));
    assert_eq!(dist.histogram().map(|(_, combos)| combos).sum::<u64>(), 847);
    let first = dist.histogram().next().unwrap();
    assert_eq!(first, (Score(263), 1));
}

#[test]
fn band_breakdown_counts_combinations() {
    let dist = OutcomeDistribution::enumerate(&reference_attrs(), &recipe(0));
    let shares = dist.band_breakdown(&absolute_table());
    let combos: Vec<u64> = shares.iter().map(|share| share.combos).collect();
    assert_eq!(combos, vec![27, 666, 154]);
    assert_eq!(shares[0].label, "TOP");
    assert_eq!(shares[0].share_bp, 318);
    assert_eq!(shares[2].count, PotionCount(1));
    assert!(shares.iter().map(|share| share.share_bp).sum::<u64>() <= 10_000);
}

#[test]
fn expected_yield_is_weighted_mean() {
    let dist = OutcomeDistribution::enumerate(&reference_attrs(), &recipe(0));
    let table = absolute_table();
    // (27 * 3 + 666 * 2 + 154 * 1) * 100 / 847
    assert_eq!(dist.expected_yield_centi(&table), 185);
    let expected = dist.expected_yield_centi(&table);
    assert!(expected >= u64::from(table.floor().0) * 100);
    assert!(expected <= u64::from(table.cap().0) * 100);
}

#[test]
fn yield_never_drops_as_score_rises() {
    let table = absolute_table();
    let mut last = PotionCount(0);
    for value in -200..600 {
        let count = table.yield_for(Score(value));
        assert!(count >= last, "score {value}");
        last = count;
    }
}
