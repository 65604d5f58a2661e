use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use super::{Stat, StatLine};
use crate::systems::errors::NotFound;

const BP_SCALE: i64 = 10_000;

/// A consumable or skill that raises stats while active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuffDef {
    pub key: String,
    pub label: String,
    pub add: BTreeMap<Stat, i64>,
    /// Percentage bonus in basis points (`1_000` = +10%).
    pub mul_bp: BTreeMap<Stat, i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuffCatalog {
    defs: BTreeMap<String, BuffDef>,
}

impl BuffCatalog {
    pub fn new(defs: impl IntoIterator<Item = BuffDef>) -> Self {
        Self {
            defs: defs.into_iter().map(|def| (def.key.clone(), def)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Result<&BuffDef, NotFound> {
        self.defs
            .get(key)
            .ok_or_else(|| NotFound::Buff(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defs.contains_key(key)
    }

    /// Buffs in key order.
    pub fn iter(&self) -> impl Iterator<Item = &BuffDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Effective stats with every active buff applied. Additive deltas are summed
    /// first; percentage bonuses then scale the summed value, rounding down.
    /// Keys this catalogue does not know are skipped.
    pub fn apply<'a>(&self, base: &StatLine, active: impl IntoIterator<Item = &'a str>) -> StatLine {
        let mut add = StatLine::default();
        let mut mul_bp = StatLine::default();
        for key in active {
            let Some(def) = self.defs.get(key) else {
                warn!("buff_unknown key={key}");
                continue;
            };
            for (stat, delta) in &def.add {
                *add.get_mut(*stat) += delta;
            }
            for (stat, bp) in &def.mul_bp {
                *mul_bp.get_mut(*stat) += bp;
            }
        }

        let mut effective = *base;
        for stat in Stat::ALL {
            let summed = base.get(stat).saturating_add(add.get(stat));
            let bonus = summed.saturating_mul(mul_bp.get(stat)).div_euclid(BP_SCALE);
            *effective.get_mut(stat) = summed.saturating_add(bonus);
        }
        debug!(
            "buffs_applied int={} dex={} luk={}",
            effective.int, effective.dex, effective.luk
        );
        effective
    }
}
