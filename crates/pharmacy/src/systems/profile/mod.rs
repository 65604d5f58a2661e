//! Character profile persisted as `profile.v1` JSON.
//!
//! Absent sections and fields take the built-in defaults, so a hand-written
//! profile only needs the values that differ.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::atomic::write_json_atomic;
use super::errors::{NotFound, ValidationError};
use super::pharmacy::{parse_field, BuffCatalog, RawAttributes, Stat, StatLine};

pub const PROFILE_SCHEMA: &str = "profile.v1";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: unsupported profile schema {schema:?}")]
    UnsupportedSchema { path: PathBuf, schema: String },
    #[error("unknown profile field {0:?}")]
    UnknownField(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Levels {
    pub job_level: i64,
    pub base_level: i64,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            job_level: 50,
            base_level: 120,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Skills {
    pub potion_research: i64,
    pub chemical_protection_full: i64,
    pub advanced_pharmacy: i64,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            potion_research: 10,
            chemical_protection_full: 5,
            advanced_pharmacy: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub schema: String,
    #[serde(deserialize_with = "partial_stats")]
    pub stats: StatLine,
    pub levels: Levels,
    pub skills: Skills,
    /// Buff key to enabled flag.
    pub buffs: BTreeMap<String, bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            schema: PROFILE_SCHEMA.to_string(),
            stats: default_stats(),
            levels: Levels::default(),
            skills: Skills::default(),
            buffs: BTreeMap::new(),
        }
    }
}

fn default_stats() -> StatLine {
    StatLine {
        str: 100,
        agi: 100,
        vit: 100,
        int: 100,
        dex: 100,
        luk: 100,
    }
}

/// Stats object where every missing stat keeps its default.
fn partial_stats<'de, D>(deserializer: D) -> Result<StatLine, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
    let mut stats = default_stats();
    for (key, value) in raw {
        let stat = Stat::from_key(&key)
            .ok_or_else(|| <D::Error as serde::de::Error>::unknown_field(&key, STAT_KEYS))?;
        *stats.get_mut(stat) = value;
    }
    Ok(stats)
}

const STAT_KEYS: &[&str] = &["str", "agi", "vit", "int", "dex", "luk"];

impl Profile {
    /// Probes the schema tag before deserializing; an untagged object is read
    /// as `profile.v1`.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, ProfileError> {
        if let Some(schema) = value.get("schema") {
            let schema = schema.as_str().unwrap_or_default();
            if schema != PROFILE_SCHEMA {
                return Err(ProfileError::UnsupportedSchema {
                    path: path.to_path_buf(),
                    schema: schema.to_string(),
                });
            }
        }
        let mut profile: Profile =
            serde_json::from_value(value).map_err(|source| ProfileError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        profile.schema = PROFILE_SCHEMA.to_string();
        Ok(profile)
    }

    pub fn raw_attributes(&self) -> RawAttributes {
        RawAttributes {
            intelligence: self.stats.int,
            dexterity: self.stats.dex,
            luck: self.stats.luk,
            base_level: self.levels.base_level,
            job_level: self.levels.job_level,
            potion_research: self.skills.potion_research,
            chemical_protection: self.skills.chemical_protection_full,
            pharmacy_level: self.skills.advanced_pharmacy,
        }
    }

    /// Enabled buff keys in key order.
    pub fn active_buffs(&self) -> impl Iterator<Item = &str> {
        self.buffs
            .iter()
            .filter(|(_, on)| **on)
            .map(|(key, _)| key.as_str())
    }

    /// Sets one field from text. Stats use their short keys (`int`, `dex`, ...);
    /// levels and skills use their JSON names.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ProfileError> {
        let (field, slot) = match key {
            "job_level" => ("job_level", &mut self.levels.job_level),
            "base_level" => ("base_level", &mut self.levels.base_level),
            "potion_research" => ("potion_research", &mut self.skills.potion_research),
            "chemical_protection_full" | "chemical_protection" => (
                "chemical_protection",
                &mut self.skills.chemical_protection_full,
            ),
            "advanced_pharmacy" | "pharmacy_level" => {
                ("pharmacy_level", &mut self.skills.advanced_pharmacy)
            }
            other => match Stat::from_key(other) {
                Some(stat) => (stat.key(), self.stats.get_mut(stat)),
                None => return Err(ProfileError::UnknownField(other.to_string())),
            },
        };
        *slot = parse_field(field, raw)?;
        Ok(())
    }

    pub fn set_buff(&mut self, catalog: &BuffCatalog, key: &str, on: bool) -> Result<(), NotFound> {
        catalog.get(key)?;
        self.buffs.insert(key.to_string(), on);
        Ok(())
    }

    /// Drops toggles for buffs the rule pack does not define.
    pub fn retain_known_buffs(&mut self, catalog: &BuffCatalog) {
        self.buffs.retain(|key, _| {
            let known = catalog.contains(key);
            if !known {
                warn!("profile_buff_unknown key={key}");
            }
            known
        });
    }
}

pub fn read_profile(path: &Path) -> Result<Profile, ProfileError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| ProfileError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Profile::from_value(path, value)
}

pub fn write_profile(path: &Path, profile: &Profile) -> Result<(), ProfileError> {
    write_json_atomic(path, profile).map_err(|source| ProfileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// The user's profile file and the packaged default it falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    pub user_path: PathBuf,
    pub default_path: PathBuf,
}

impl ProfileStore {
    pub fn new(user_path: PathBuf, default_path: PathBuf) -> Self {
        Self {
            user_path,
            default_path,
        }
    }

    /// User file, then packaged default, then built-in values.
    pub fn load(&self) -> Profile {
        match read_profile(&self.user_path) {
            Ok(profile) => return profile,
            Err(ProfileError::Read { .. }) if !self.user_path.exists() => {}
            Err(err) => warn!("profile_user_invalid fallback=default error={err}"),
        }
        match read_profile(&self.default_path) {
            Ok(profile) => profile,
            Err(err) => {
                warn!("profile_default_invalid fallback=builtin error={err}");
                Profile::default()
            }
        }
    }

    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        write_profile(&self.user_path, profile)?;
        info!("profile_saved path={}", self.user_path.display());
        Ok(())
    }

    /// Replaces the user file with the packaged default.
    pub fn reset(&self) -> Result<Profile, ProfileError> {
        let profile = read_profile(&self.default_path)?;
        self.save(&profile)?;
        Ok(profile)
    }

    /// Reads `path` and makes it the user's profile. Buffs `known` does not
    /// define are dropped before saving.
    pub fn import(&self, path: &Path, known: &BuffCatalog) -> Result<Profile, ProfileError> {
        let mut profile = read_profile(path)?;
        profile.retain_known_buffs(known);
        self.save(&profile)?;
        Ok(profile)
    }

    pub fn export(&self, profile: &Profile, path: &Path) -> Result<(), ProfileError> {
        write_profile(path, profile)?;
        info!("profile_exported path={}", path.display());
        Ok(())
    }
}
