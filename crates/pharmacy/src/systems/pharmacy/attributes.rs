use serde::{Deserialize, Serialize};

use super::{SkillLevel, StatLine};
use crate::systems::errors::ValidationError;

/// Inclusive bounds for one attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limit {
    pub min: i64,
    pub max: i64,
}

impl Limit {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    fn check(self, field: &'static str, value: i64) -> Result<i64, ValidationError> {
        if value < 0 {
            return Err(ValidationError::Negative { field, value });
        }
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributeLimits {
    pub stat: Limit,
    pub base_level: Limit,
    pub job_level: Limit,
    pub potion_research: Limit,
    pub chemical_protection: Limit,
    pub pharmacy_level: Limit,
}

impl Default for AttributeLimits {
    fn default() -> Self {
        Self {
            stat: Limit::new(1, 500),
            base_level: Limit::new(1, 175),
            job_level: Limit::new(1, 70),
            potion_research: Limit::new(0, 10),
            chemical_protection: Limit::new(0, 5),
            pharmacy_level: Limit::new(1, 10),
        }
    }
}

/// Attribute values before validation, as read from a profile or typed by a user.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawAttributes {
    pub intelligence: i64,
    pub dexterity: i64,
    pub luck: i64,
    pub base_level: i64,
    pub job_level: i64,
    pub potion_research: i64,
    pub chemical_protection: i64,
    pub pharmacy_level: i64,
}

impl RawAttributes {
    pub fn validate(&self, limits: &AttributeLimits) -> Result<AttributeSet, ValidationError> {
        let pharmacy_level = limits.pharmacy_level.check("pharmacy_level", self.pharmacy_level)?;
        Ok(AttributeSet {
            intelligence: limits.stat.check("int", self.intelligence)?,
            dexterity: limits.stat.check("dex", self.dexterity)?,
            luck: limits.stat.check("luk", self.luck)?,
            base_level: limits.base_level.check("base_level", self.base_level)?,
            job_level: limits.job_level.check("job_level", self.job_level)?,
            potion_research: limits
                .potion_research
                .check("potion_research", self.potion_research)?,
            chemical_protection: limits
                .chemical_protection
                .check("chemical_protection", self.chemical_protection)?,
            pharmacy_level: SkillLevel(u8::try_from(pharmacy_level).map_err(|_| {
                ValidationError::OutOfRange {
                    field: "pharmacy_level",
                    value: pharmacy_level,
                    min: 0,
                    max: i64::from(u8::MAX),
                }
            })?),
        })
    }
}

/// Validated inputs of the score formula.
///
/// Only [`RawAttributes::validate`] builds one, so every value sat inside its
/// limits at validation time. Buffs applied afterwards through
/// [`AttributeSet::with_effective_stats`] may push INT/DEX/LUK past the stat cap,
/// as they do in game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    intelligence: i64,
    dexterity: i64,
    luck: i64,
    base_level: i64,
    job_level: i64,
    potion_research: i64,
    chemical_protection: i64,
    pharmacy_level: SkillLevel,
}

impl AttributeSet {
    pub fn intelligence(&self) -> i64 {
        self.intelligence
    }

    pub fn dexterity(&self) -> i64 {
        self.dexterity
    }

    pub fn luck(&self) -> i64 {
        self.luck
    }

    pub fn base_level(&self) -> i64 {
        self.base_level
    }

    pub fn job_level(&self) -> i64 {
        self.job_level
    }

    pub fn potion_research(&self) -> i64 {
        self.potion_research
    }

    pub fn chemical_protection(&self) -> i64 {
        self.chemical_protection
    }

    pub fn pharmacy_level(&self) -> SkillLevel {
        self.pharmacy_level
    }

    pub fn with_effective_stats(mut self, stats: &StatLine) -> Self {
        self.intelligence = stats.int;
        self.dexterity = stats.dex;
        self.luck = stats.luk;
        self
    }
}

/// Textual attribute input. `None` fields fall back to another source (usually
/// the stored profile).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeInput {
    pub intelligence: Option<String>,
    pub dexterity: Option<String>,
    pub luck: Option<String>,
    pub base_level: Option<String>,
    pub job_level: Option<String>,
    pub potion_research: Option<String>,
    pub chemical_protection: Option<String>,
    pub pharmacy_level: Option<String>,
}

impl AttributeInput {
    pub fn resolve(&self, fallback: RawAttributes) -> Result<RawAttributes, ValidationError> {
        Ok(RawAttributes {
            intelligence: pick("int", &self.intelligence, fallback.intelligence)?,
            dexterity: pick("dex", &self.dexterity, fallback.dexterity)?,
            luck: pick("luk", &self.luck, fallback.luck)?,
            base_level: pick("base_level", &self.base_level, fallback.base_level)?,
            job_level: pick("job_level", &self.job_level, fallback.job_level)?,
            potion_research: pick(
                "potion_research",
                &self.potion_research,
                fallback.potion_research,
            )?,
            chemical_protection: pick(
                "chemical_protection",
                &self.chemical_protection,
                fallback.chemical_protection,
            )?,
            pharmacy_level: pick(
                "pharmacy_level",
                &self.pharmacy_level,
                fallback.pharmacy_level,
            )?,
        })
    }
}

fn pick(field: &'static str, raw: &Option<String>, fallback: i64) -> Result<i64, ValidationError> {
    match raw {
        Some(raw) => parse_field(field, raw),
        None => Ok(fallback),
    }
}

/// Accepts only whole non-negative numbers: `"3.5"`, `"abc"` and `"-5"` are all
/// rejected.
pub fn parse_field(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            raw: raw.to_string(),
        })?;
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}
