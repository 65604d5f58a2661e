use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::systems::errors::{ConfigError, NotFound};
use crate::systems::pharmacy::{
    load_rulepack, BuffCatalog, PharmacyRules, PotionCount, SkillLevel, YieldTable,
};

pub mod recipe;
pub mod types;

pub use recipe::parse_recipe;
pub use types::{Item, ItemFields, ItemId, ItemKind, ItemRow, Material, Recipe, Zeny};

const ITEMS_SCHEMA: &str = "items.v1";

/// Files the catalog is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub items: PathBuf,
    pub prices: PathBuf,
    pub rulepack: PathBuf,
}

impl CatalogPaths {
    /// Standard layout below an assets directory.
    pub fn under(root: &Path) -> Self {
        Self {
            items: root.join("catalog").join("items.json"),
            prices: root.join("defaults").join("prices.json"),
            rulepack: root.join("rulepacks").join("advanced_pharmacy.toml"),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemsV1 {
    #[allow(dead_code)]
    schema: String,
    items: Vec<ItemRow>,
}

/// Immutable game data: items, recipes, default prices and the validated rule
/// pack. Built once, then shared by reference.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: BTreeMap<ItemId, Item>,
    recipes: BTreeMap<ItemId, Recipe>,
    default_prices: BTreeMap<ItemId, Zeny>,
    rules: PharmacyRules,
}

impl CatalogStore {
    pub fn load(paths: &CatalogPaths) -> Result<Self, ConfigError> {
        let rows = read_item_rows(&paths.items)?;
        let prices = read_json(&paths.prices)?;
        let pack = load_rulepack(&paths.rulepack)?;
        let rules = PharmacyRules::from_rulepack(&pack)?;
        let store = Self::build(rows, prices, rules)?;
        info!(
            "catalog_loaded items={} recipes={} levels={} buffs={}",
            store.items.len(),
            store.recipes.len(),
            store.rules.levels().count(),
            store.rules.buffs().len()
        );
        Ok(store)
    }

    /// Assembles a store from already parsed inputs.
    pub fn build(
        rows: Vec<(u32, ItemFields)>,
        prices: BTreeMap<String, i64>,
        rules: PharmacyRules,
    ) -> Result<Self, ConfigError> {
        let default_prices = price_table(&prices)?;

        let mut items = BTreeMap::new();
        let mut recipe_strings = Vec::new();
        for (raw_id, fields) in rows {
            let id = ItemId(raw_id);
            let name = fields
                .display_name()
                .ok_or(ConfigError::MissingName { item: id })?
                .to_string();
            let item = Item {
                id,
                name,
                kind: fields.kind.unwrap_or_default(),
                icon: fields.icon.clone().unwrap_or_default(),
                base_price: default_prices.get(&id).copied().unwrap_or(Zeny::ZERO),
            };
            if items.insert(id, item).is_some() {
                return Err(ConfigError::DuplicateItem { item: id });
            }
            if let Some(raw) = fields.recipe {
                recipe_strings.push((id, raw));
            }
        }

        for id in default_prices.keys() {
            if !items.contains_key(id) {
                return Err(ConfigError::UnknownItem {
                    section: "prices",
                    item: id.to_string(),
                });
            }
        }
        for id in rules.item_ids() {
            if !items.contains_key(&id) {
                return Err(ConfigError::UnknownItem {
                    section: "items",
                    item: id.to_string(),
                });
            }
        }

        let mut recipes = BTreeMap::new();
        for (id, raw) in recipe_strings {
            let materials = parse_recipe(id, &raw)?;
            if let Some(missing) = materials.iter().find(|m| !items.contains_key(&m.item)) {
                return Err(ConfigError::DanglingIngredient {
                    item: id,
                    ingredient: missing.item,
                });
            }
            let Some(difficulty) = rules.item_difficulty(id) else {
                warn!("recipe_skipped item={id} reason=no_difficulty");
                continue;
            };
            recipes.insert(
                id,
                Recipe {
                    output: id,
                    materials,
                    difficulty,
                    formula: rules.formula(),
                },
            );
        }
        if let Some(id) = rules.item_ids().find(|id| !recipes.contains_key(id)) {
            return Err(ConfigError::Invalid {
                section: "items",
                reason: format!("item {id} has a difficulty but no recipe"),
            });
        }

        Ok(Self {
            items,
            recipes,
            default_prices,
            rules,
        })
    }

    pub fn get_item(&self, id: ItemId) -> Result<&Item, NotFound> {
        self.items.get(&id).ok_or(NotFound::Item(id))
    }

    /// `NotFound::Recipe` only means the item is not craftable here.
    pub fn get_recipe(&self, id: ItemId) -> Result<&Recipe, NotFound> {
        self.recipes.get(&id).ok_or(NotFound::Recipe(id))
    }

    /// Case-insensitive match on the display name.
    pub fn find_item_by_name(&self, name: &str) -> Result<&Item, NotFound> {
        let wanted = name.trim().to_lowercase();
        self.items
            .values()
            .find(|item| item.name.to_lowercase() == wanted)
            .ok_or_else(|| NotFound::Name(name.to_string()))
    }

    /// All items, ascending by id.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn final_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .values()
            .filter(|item| item.kind == ItemKind::Final)
    }

    /// Items with a recipe and pharmacy rules, ascending by id.
    pub fn pharmacy_items(&self) -> impl Iterator<Item = (&Item, &Recipe)> {
        self.recipes
            .iter()
            .filter_map(|(id, recipe)| self.items.get(id).map(|item| (item, recipe)))
    }

    pub fn rules(&self) -> &PharmacyRules {
        &self.rules
    }

    /// Total difficulty of crafting `id` at `level`.
    pub fn item_difficulty(&self, id: ItemId, level: SkillLevel) -> Result<i64, NotFound> {
        let recipe = self.get_recipe(id)?;
        Ok(self.rules.base_difficulty(level)? + recipe.difficulty)
    }

    pub fn yield_table(&self, id: ItemId, level: SkillLevel) -> Result<YieldTable, NotFound> {
        let difficulty = self.item_difficulty(id, level)?;
        self.rules.yield_table(difficulty, level)
    }

    pub fn potion_cap(&self, level: SkillLevel) -> Result<PotionCount, NotFound> {
        self.rules.potion_cap(level)
    }

    pub fn levels(&self) -> impl Iterator<Item = SkillLevel> + '_ {
        self.rules.levels()
    }

    pub fn buffs(&self) -> &BuffCatalog {
        self.rules.buffs()
    }

    pub fn default_prices(&self) -> &BTreeMap<ItemId, Zeny> {
        &self.default_prices
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Accepts the `items.v1` envelope, a bare list of rows, or an object keyed by id.
pub fn read_item_rows(path: &Path) -> Result<Vec<(u32, ItemFields)>, ConfigError> {
    let value: Value = read_json(path)?;
    let json_err = |source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    };
    if let Some(schema) = value.get("schema") {
        let schema = schema.as_str().unwrap_or_default();
        if schema != ITEMS_SCHEMA {
            return Err(ConfigError::UnsupportedSchema {
                path: path.to_path_buf(),
                schema: schema.to_string(),
            });
        }
        let envelope: ItemsV1 = serde_json::from_value(value).map_err(json_err)?;
        return envelope
            .items
            .into_iter()
            .map(ItemRow::into_parts)
            .collect::<Result<_, _>>()
            .map_err(json_err);
    }
    match value {
        Value::Array(_) => {
            let rows: Vec<ItemRow> = serde_json::from_value(value).map_err(json_err)?;
            rows.into_iter()
                .map(ItemRow::into_parts)
                .collect::<Result<_, _>>()
                .map_err(json_err)
        }
        Value::Object(_) => {
            let by_id: BTreeMap<String, ItemFields> =
                serde_json::from_value(value).map_err(json_err)?;
            by_id
                .into_iter()
                .map(|(key, fields)| {
                    key.trim()
                        .parse::<u32>()
                        .map(|id| (id, fields))
                        .map_err(|_| ConfigError::UnknownItem {
                            section: "catalog",
                            item: key,
                        })
                })
                .collect()
        }
        other => Err(ConfigError::UnsupportedShape {
            path: path.to_path_buf(),
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn price_table(raw: &BTreeMap<String, i64>) -> Result<BTreeMap<ItemId, Zeny>, ConfigError> {
    let mut prices = BTreeMap::new();
    for (key, price) in raw {
        let id = key
            .trim()
            .parse::<u32>()
            .map(ItemId)
            .map_err(|_| ConfigError::UnknownItem {
                section: "prices",
                item: key.clone(),
            })?;
        if *price < 0 {
            return Err(ConfigError::Invalid {
                section: "prices",
                reason: format!("price of {id} is negative"),
            });
        }
        if prices.insert(id, Zeny(*price)).is_some() {
            warn!("price_duplicate item={id}");
        }
    }
    Ok(prices)
}

#[cfg(test)]
mod tests;
