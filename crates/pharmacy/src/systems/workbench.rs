use log::debug;
use serde::Serialize;

use super::catalog::{CatalogStore, ItemId};
use super::errors::CalcError;
use super::pharmacy::{
    score_range, AttributeInput, AttributeSet, BandShare, OutcomeDistribution, PotionCount,
    ScoreRange, SkillLevel, StatLine,
};
use super::prices::PriceBook;
use super::production::{production_costs, CostRow};
use super::profile::Profile;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PharmacyRow {
    pub item_id: ItemId,
    pub name: String,
    /// Skill-level base difficulty plus the item's own.
    pub difficulty: i64,
    pub bands: Vec<BandShare>,
    pub expected_yield_centi: u64,
}

/// Everything one evaluation of the Advanced Pharmacy tab shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PharmacySnapshot {
    pub level: SkillLevel,
    pub range: ScoreRange,
    pub potion_cap: PotionCount,
    pub effective: StatLine,
    pub rows: Vec<PharmacyRow>,
}

impl PharmacySnapshot {
    pub fn row(&self, item: ItemId) -> Option<&PharmacyRow> {
        self.rows.iter().find(|row| row.item_id == item)
    }
}

/// A character's state over a borrowed catalog.
pub struct Workbench<'a> {
    catalog: &'a CatalogStore,
    profile: Profile,
    prices: PriceBook,
}

impl<'a> Workbench<'a> {
    pub fn new(catalog: &'a CatalogStore, profile: Profile, prices: PriceBook) -> Self {
        Self {
            catalog,
            profile,
            prices,
        }
    }

    pub fn catalog(&self) -> &'a CatalogStore {
        self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut PriceBook {
        &mut self.prices
    }

    /// Validated base attributes with the active buffs folded into INT/DEX/LUK.
    pub fn attributes(&self) -> Result<(AttributeSet, StatLine), CalcError> {
        self.attributes_with(&AttributeInput::default(), &[])
    }

    /// Like [`Workbench::attributes`], with typed values replacing profile ones
    /// and `extra_buffs` enabled on top of the profile's toggles.
    pub fn attributes_with(
        &self,
        input: &AttributeInput,
        extra_buffs: &[String],
    ) -> Result<(AttributeSet, StatLine), CalcError> {
        let raw = input.resolve(self.profile.raw_attributes())?;
        let base = raw.validate(self.catalog.rules().limits())?;

        let buffs = self.catalog.buffs();
        for key in extra_buffs {
            buffs.get(key)?;
        }
        let mut stats = self.profile.stats;
        stats.int = raw.intelligence;
        stats.dex = raw.dexterity;
        stats.luk = raw.luck;
        let active = self
            .profile
            .active_buffs()
            .chain(extra_buffs.iter().map(String::as_str));
        let effective = buffs.apply(&stats, active);
        Ok((base.with_effective_stats(&effective), effective))
    }

    /// Rows for every pharmacy item, ascending by id.
    pub fn snapshot(&self) -> Result<PharmacySnapshot, CalcError> {
        let (attrs, effective) = self.attributes()?;
        snapshot_for(self.catalog, &attrs, effective)
    }

    pub fn production_costs(&self, snapshot: &PharmacySnapshot) -> Vec<CostRow> {
        production_costs(self.catalog, &self.prices, snapshot)
    }
}

/// Evaluates every pharmacy item for one attribute set.
pub fn snapshot_for(
    catalog: &CatalogStore,
    attrs: &AttributeSet,
    effective: StatLine,
) -> Result<PharmacySnapshot, CalcError> {
    let level = attrs.pharmacy_level();
    let potion_cap = catalog.potion_cap(level)?;

    // All recipes share the rule pack formula.
    let range = score_range(attrs, &catalog.rules().formula());

    let mut rows = Vec::new();
    for (item, recipe) in catalog.pharmacy_items() {
        let distribution = OutcomeDistribution::enumerate(attrs, recipe);
        let table = catalog.yield_table(item.id, level)?;
        rows.push(PharmacyRow {
            item_id: item.id,
            name: item.name.clone(),
            difficulty: catalog.item_difficulty(item.id, level)?,
            bands: distribution.band_breakdown(&table),
            expected_yield_centi: distribution.expected_yield_centi(&table),
        });
    }

    debug!(
        "pharmacy_snapshot level={level} min={} max={} cap={potion_cap} rows={}",
        range.min,
        range.max,
        rows.len()
    );
    Ok(PharmacySnapshot {
        level,
        range,
        potion_cap,
        effective,
        rows,
    })
}
