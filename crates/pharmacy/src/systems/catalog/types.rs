use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::systems::pharmacy::FormulaConstants;

newtype!(ItemId, u32);
newtype!(Zeny, i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Zeny {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_mul(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(qty)))
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Final,
    Intermediate,
    #[default]
    Material,
}

/// One row of the list shapes of `items.json`: the id plus an [`ItemFields`] body.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRow {
    pub id: u32,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ItemRow {
    /// Unknown keys in the body are rejected here, not by `flatten`.
    pub fn into_parts(self) -> Result<(u32, ItemFields), serde_json::Error> {
        let fields = ItemFields::deserialize(Value::Object(self.rest))?;
        Ok((self.id, fields))
    }
}

/// Row body of the map-by-id shape; list rows are converted into it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFields {
    #[serde(default)]
    pub name_pt: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub recipe: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ItemFields {
    /// Portuguese name first, then English, then the plain name.
    pub fn display_name(&self) -> Option<&str> {
        [&self.name_pt, &self.name_en, &self.name]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub icon: String,
    pub base_price: Zeny,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Material {
    pub item: ItemId,
    pub quantity: u32,
}

/// How one pharmacy item is produced: what it consumes and the formula it rolls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub output: ItemId,
    pub materials: Vec<Material>,
    /// Item-specific difficulty added on top of the skill level's base difficulty.
    pub difficulty: i64,
    pub formula: FormulaConstants,
}
