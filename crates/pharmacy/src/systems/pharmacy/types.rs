use std::fmt;

use serde::{Deserialize, Serialize};

newtype!(Score, i64);
newtype!(PotionCount, u32);
newtype!(SkillLevel, u8);

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PotionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Character stats as the game names them. Only INT, DEX and LUK feed the formula,
/// the rest are carried so buffs and profiles stay faithful to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Str,
    Agi,
    Vit,
    Int,
    Dex,
    Luk,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Str,
        Stat::Agi,
        Stat::Vit,
        Stat::Int,
        Stat::Dex,
        Stat::Luk,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Stat::Str => "str",
            Stat::Agi => "agi",
            Stat::Vit => "vit",
            Stat::Int => "int",
            Stat::Dex => "dex",
            Stat::Luk => "luk",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stat| stat.key() == key)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub str: i64,
    pub agi: i64,
    pub vit: i64,
    pub int: i64,
    pub dex: i64,
    pub luk: i64,
}

impl StatLine {
    pub fn get(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Str => self.str,
            Stat::Agi => self.agi,
            Stat::Vit => self.vit,
            Stat::Int => self.int,
            Stat::Dex => self.dex,
            Stat::Luk => self.luk,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut i64 {
        match stat {
            Stat::Str => &mut self.str,
            Stat::Agi => &mut self.agi,
            Stat::Vit => &mut self.vit,
            Stat::Int => &mut self.int,
            Stat::Dex => &mut self.dex,
            Stat::Luk => &mut self.luk,
        }
    }
}
