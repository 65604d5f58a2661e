use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use blake3::Hasher;
use log::info;
use serde::{Deserialize, Serialize};

use super::attributes::{AttributeLimits, Limit};
use super::buffs::{BuffCatalog, BuffDef};
use super::formula::{FormulaConstants, RollRange};
use super::yield_table::{YieldBand, YieldTable};
use super::{PotionCount, Score, SkillLevel, Stat};
use crate::systems::catalog::ItemId;
use crate::systems::errors::{ConfigError, NotFound};

const MAX_SKILL_LEVEL: u8 = 10;
/// Largest magnitude any configured number may have. With every term of the
/// score inside it, `score` stays far from the `i64` limits.
const MAX_MAGNITUDE: i64 = 1_000_000;
/// Largest number of (skill roll, protection roll) pairs a recipe may enumerate.
const MAX_ROLL_COMBOS: u64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rulepack {
    pub formula: FormulaCfg,
    #[serde(default)]
    pub limits: AttributeLimits,
    pub levels: LevelsCfg,
    #[serde(rename = "yield")]
    pub yields: YieldCfg,
    pub items: BTreeMap<String, i64>,
    #[serde(default)]
    pub buffs: BTreeMap<String, BuffCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaCfg {
    pub skill_roll: RangeCfg,
    pub protection_roll: RangeCfg,
    pub potion_research_weight: i64,
    pub base_level_pivot: i64,
    pub dex_divisor: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeCfg {
    pub min: i64,
    pub max: i64,
}

/// Per skill level tables. TOML keys are strings, so levels are spelled `"1"`..`"10"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelsCfg {
    pub base_difficulty: BTreeMap<String, i64>,
    pub max_potions: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YieldCfg {
    pub floor_label: String,
    pub floor_penalty: i64,
    #[serde(default)]
    pub floor_may_fail: bool,
    pub bands: Vec<BandCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandCfg {
    pub label: String,
    pub offset: i64,
    pub penalty: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuffCfg {
    pub label: String,
    #[serde(default)]
    pub add: BTreeMap<String, i64>,
    #[serde(default)]
    pub mul_bp: BTreeMap<String, i64>,
}

pub fn load_rulepack(path: &Path) -> Result<Rulepack, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rulepack: Rulepack = toml::from_str(&raw).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    log_schema_hash(&rulepack)?;
    Ok(rulepack)
}

fn log_schema_hash(rulepack: &Rulepack) -> Result<(), ConfigError> {
    let bytes = serde_json::to_vec(rulepack).map_err(ConfigError::Hash)?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    let hash = hasher.finalize();
    info!("rulepack_schema_hash={}", hash.to_hex());
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelRule {
    pub base_difficulty: i64,
    pub max_potions: PotionCount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct BandRule {
    label: String,
    offset: i64,
    penalty: u32,
}

/// Rule pack after validation. Every accessor can rely on the invariants checked
/// in [`PharmacyRules::from_rulepack`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PharmacyRules {
    formula: FormulaConstants,
    limits: AttributeLimits,
    levels: BTreeMap<SkillLevel, LevelRule>,
    bands: Vec<BandRule>,
    floor_label: String,
    floor_penalty: u32,
    item_difficulty: BTreeMap<ItemId, i64>,
    buffs: BuffCatalog,
}

impl PharmacyRules {
    pub fn from_rulepack(pack: &Rulepack) -> Result<Self, ConfigError> {
        let formula = formula_constants(&pack.formula)?;
        check_limits(&pack.limits)?;
        let levels = level_rules(&pack.levels, &pack.limits.pharmacy_level)?;
        let (bands, floor_penalty) = band_rules(&pack.yields)?;

        if !pack.yields.floor_may_fail {
            for (level, rule) in &levels {
                if rule.max_potions.0.saturating_sub(floor_penalty) == 0 {
                    return Err(ConfigError::Invalid {
                        section: "yield",
                        reason: format!(
                            "level {level} floor yields no potions; set floor_may_fail to allow it"
                        ),
                    });
                }
            }
        }

        Ok(Self {
            formula,
            limits: pack.limits,
            levels,
            bands,
            floor_label: pack.yields.floor_label.clone(),
            floor_penalty,
            item_difficulty: item_difficulties(&pack.items)?,
            buffs: buff_catalog(&pack.buffs)?,
        })
    }

    pub fn formula(&self) -> FormulaConstants {
        self.formula
    }

    pub fn limits(&self) -> &AttributeLimits {
        &self.limits
    }

    pub fn buffs(&self) -> &BuffCatalog {
        &self.buffs
    }

    /// Skill levels with rules, ascending.
    pub fn levels(&self) -> impl Iterator<Item = SkillLevel> + '_ {
        self.levels.keys().copied()
    }

    pub fn level(&self, level: SkillLevel) -> Result<&LevelRule, NotFound> {
        self.levels.get(&level).ok_or(NotFound::Level(level.0))
    }

    pub fn potion_cap(&self, level: SkillLevel) -> Result<PotionCount, NotFound> {
        Ok(self.level(level)?.max_potions)
    }

    pub fn base_difficulty(&self, level: SkillLevel) -> Result<i64, NotFound> {
        Ok(self.level(level)?.base_difficulty)
    }

    /// Items the rule pack assigns a difficulty to, ascending by id.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.item_difficulty.keys().copied()
    }

    pub fn item_difficulty(&self, item: ItemId) -> Option<i64> {
        self.item_difficulty.get(&item).copied()
    }

    /// Absolute thresholds for a recipe of total `difficulty` crafted at `level`.
    pub fn yield_table(&self, difficulty: i64, level: SkillLevel) -> Result<YieldTable, NotFound> {
        let cap = self.potion_cap(level)?.0;
        let bands = self
            .bands
            .iter()
            .map(|band| YieldBand {
                label: band.label.clone(),
                threshold: Score(difficulty.saturating_add(band.offset)),
                count: PotionCount(cap.saturating_sub(band.penalty)),
            })
            .collect();
        Ok(YieldTable::assemble(
            bands,
            self.floor_label.clone(),
            PotionCount(cap.saturating_sub(self.floor_penalty)),
        ))
    }
}

fn invalid(section: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        section,
        reason: reason.into(),
    }
}

fn bounded(section: &'static str, name: &str, value: i64) -> Result<i64, ConfigError> {
    if (-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(
            section,
            format!("{name} = {value} is outside -{MAX_MAGNITUDE}..={MAX_MAGNITUDE}"),
        ))
    }
}

fn roll_range(name: &str, cfg: RangeCfg) -> Result<RollRange, ConfigError> {
    bounded("formula", name, cfg.min)?;
    bounded("formula", name, cfg.max)?;
    RollRange::new(cfg.min, cfg.max).ok_or_else(|| {
        invalid(
            "formula",
            format!("{name} min {} exceeds max {}", cfg.min, cfg.max),
        )
    })
}

fn formula_constants(cfg: &FormulaCfg) -> Result<FormulaConstants, ConfigError> {
    if cfg.dex_divisor <= 0 {
        return Err(invalid("formula", "dex_divisor must be positive"));
    }
    if cfg.potion_research_weight < 0 || cfg.base_level_pivot < 0 {
        return Err(invalid("formula", "weights must be non-negative"));
    }
    bounded("formula", "dex_divisor", cfg.dex_divisor)?;
    bounded("formula", "potion_research_weight", cfg.potion_research_weight)?;
    bounded("formula", "base_level_pivot", cfg.base_level_pivot)?;
    let skill_roll = roll_range("skill_roll", cfg.skill_roll)?;
    let protection_roll = roll_range("protection_roll", cfg.protection_roll)?;
    if protection_roll.min() < 0 {
        return Err(invalid("formula", "protection_roll must be non-negative"));
    }
    let combos = skill_roll.span().saturating_mul(protection_roll.span());
    if combos > MAX_ROLL_COMBOS {
        return Err(invalid(
            "formula",
            format!("rolls give {combos} combinations, more than {MAX_ROLL_COMBOS}"),
        ));
    }
    Ok(FormulaConstants {
        skill_roll,
        protection_roll,
        potion_research_weight: cfg.potion_research_weight,
        base_level_pivot: cfg.base_level_pivot,
        dex_divisor: cfg.dex_divisor,
    })
}

fn check_limits(limits: &AttributeLimits) -> Result<(), ConfigError> {
    let named = [
        ("stat", limits.stat),
        ("base_level", limits.base_level),
        ("job_level", limits.job_level),
        ("potion_research", limits.potion_research),
        ("chemical_protection", limits.chemical_protection),
        ("pharmacy_level", limits.pharmacy_level),
    ];
    for (name, Limit { min, max }) in named {
        if min < 0 || min > max {
            return Err(invalid("limits", format!("{name} has bounds {min}..={max}")));
        }
        bounded("limits", name, max)?;
    }
    if limits.pharmacy_level.max > i64::from(MAX_SKILL_LEVEL) {
        return Err(invalid(
            "limits",
            format!("pharmacy_level cannot exceed {MAX_SKILL_LEVEL}"),
        ));
    }
    Ok(())
}

fn parse_level(raw: &str) -> Result<SkillLevel, ConfigError> {
    match raw.trim().parse::<u8>() {
        Ok(level) if level <= MAX_SKILL_LEVEL => Ok(SkillLevel(level)),
        _ => Err(invalid("levels", format!("bad skill level key {raw:?}"))),
    }
}

fn level_rules(
    cfg: &LevelsCfg,
    bounds: &Limit,
) -> Result<BTreeMap<SkillLevel, LevelRule>, ConfigError> {
    if cfg.base_difficulty.is_empty() {
        return Err(invalid("levels", "base_difficulty is empty"));
    }
    let mut caps = BTreeMap::new();
    for (raw, cap) in &cfg.max_potions {
        let count = u32::try_from(*cap)
            .map_err(|_| invalid("levels", format!("max_potions[{raw}] is negative")))?;
        caps.insert(parse_level(raw)?, PotionCount(count));
    }

    let mut levels = BTreeMap::new();
    for (raw, difficulty) in &cfg.base_difficulty {
        let level = parse_level(raw)?;
        if *difficulty < 0 {
            return Err(invalid("levels", format!("base_difficulty[{raw}] is negative")));
        }
        bounded("levels", "base_difficulty", *difficulty)?;
        let max_potions = caps
            .remove(&level)
            .ok_or_else(|| invalid("levels", format!("max_potions has no level {level}")))?;
        levels.insert(
            level,
            LevelRule {
                base_difficulty: *difficulty,
                max_potions,
            },
        );
    }
    if let Some(level) = caps.keys().next() {
        return Err(invalid(
            "levels",
            format!("base_difficulty has no level {level}"),
        ));
    }

    for level in bounds.min..=bounds.max {
        let covered = u8::try_from(level)
            .map(|level| levels.contains_key(&SkillLevel(level)))
            .unwrap_or(false);
        if !covered {
            return Err(invalid("levels", format!("no rules for skill level {level}")));
        }
    }
    Ok(levels)
}

fn band_rules(cfg: &YieldCfg) -> Result<(Vec<BandRule>, u32), ConfigError> {
    if cfg.bands.is_empty() {
        return Err(invalid("yield", "bands is empty"));
    }
    let penalty = |label: &str, value: i64| {
        u32::try_from(value).map_err(|_| invalid("yield", format!("{label} penalty is negative")))
    };

    let mut bands: Vec<BandRule> = Vec::with_capacity(cfg.bands.len());
    for band in &cfg.bands {
        if band.label.trim().is_empty() {
            return Err(invalid("yield", "band label is empty"));
        }
        let rule = BandRule {
            label: band.label.clone(),
            offset: bounded("yield", &band.label, band.offset)?,
            penalty: penalty(&band.label, band.penalty)?,
        };
        if let Some(prev) = bands.last() {
            if rule.offset >= prev.offset {
                return Err(invalid(
                    "yield",
                    format!("offset of {} must be below {}", rule.label, prev.label),
                ));
            }
            if rule.penalty < prev.penalty {
                return Err(invalid(
                    "yield",
                    format!("penalty of {} must not be below {}", rule.label, prev.label),
                ));
            }
        }
        bands.push(rule);
    }

    let floor_penalty = penalty(&cfg.floor_label, cfg.floor_penalty)?;
    if bands.last().is_some_and(|last| floor_penalty < last.penalty) {
        return Err(invalid(
            "yield",
            "floor_penalty must not be below the last band",
        ));
    }
    Ok((bands, floor_penalty))
}

fn item_difficulties(items: &BTreeMap<String, i64>) -> Result<BTreeMap<ItemId, i64>, ConfigError> {
    if items.is_empty() {
        return Err(invalid("items", "no pharmacy items"));
    }
    items
        .iter()
        .map(|(raw, difficulty)| {
            let id = raw.trim().parse::<u32>().map_err(|_| ConfigError::UnknownItem {
                section: "items",
                item: raw.clone(),
            })?;
            if *difficulty < 0 {
                return Err(invalid("items", format!("difficulty of {raw} is negative")));
            }
            bounded("items", raw, *difficulty)?;
            Ok((ItemId(id), *difficulty))
        })
        .collect()
}

fn stat_map(buff: &str, raw: &BTreeMap<String, i64>) -> Result<BTreeMap<Stat, i64>, ConfigError> {
    raw.iter()
        .map(|(key, value)| {
            let stat = Stat::from_key(key)
                .ok_or_else(|| invalid("buffs", format!("{buff}: unknown stat {key:?}")))?;
            Ok((stat, bounded("buffs", &format!("{buff}.{key}"), *value)?))
        })
        .collect()
}

fn buff_catalog(cfg: &BTreeMap<String, BuffCfg>) -> Result<BuffCatalog, ConfigError> {
    let defs = cfg
        .iter()
        .map(|(key, buff)| {
            Ok(BuffDef {
                key: key.clone(),
                label: buff.label.clone(),
                add: stat_map(key, &buff.add)?,
                mul_bp: stat_map(key, &buff.mul_bp)?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(BuffCatalog::new(defs))
}
