use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use super::atomic::write_json_atomic;
use super::catalog::{CatalogStore, ItemId, Zeny};
use super::errors::{NotFound, ValidationError};

#[derive(Debug, Error)]
pub enum PriceError {
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
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Where the prices currently in a [`PriceBook`] came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Default,
    User,
    Live,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PriceSource::Default => "default",
            PriceSource::User => "user",
            PriceSource::Live => "live",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub item_id: ItemId,
    pub name: String,
    pub price: Zeny,
}

/// Zeny price per item: packaged defaults overlaid with the user's own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceBook {
    prices: BTreeMap<ItemId, Zeny>,
    source: PriceSource,
}

pub fn read_price_file(path: &Path) -> Result<BTreeMap<String, i64>, PriceError> {
    let raw = fs::read_to_string(path).map_err(|source| PriceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PriceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl PriceBook {
    pub fn defaults(catalog: &CatalogStore) -> Self {
        Self {
            prices: catalog.default_prices().clone(),
            source: PriceSource::Default,
        }
    }

    /// User prices from `user_path` on top of the defaults. A missing or broken
    /// user file leaves the defaults in place.
    pub fn load(catalog: &CatalogStore, user_path: &Path) -> Self {
        let mut book = Self::defaults(catalog);
        if !user_path.exists() {
            debug!("prices_user_absent path={}", user_path.display());
            return book;
        }
        let overrides = match read_price_file(user_path) {
            Ok(overrides) => overrides,
            Err(err) => {
                warn!("prices_user_invalid fallback=default error={err}");
                return book;
            }
        };
        let mut applied = 0usize;
        for (key, price) in overrides {
            let Some(id) = key.trim().parse::<u32>().ok().map(ItemId) else {
                warn!("prices_user_skip key={key:?} reason=not_an_id");
                continue;
            };
            if catalog.get_item(id).is_err() {
                warn!("prices_user_skip item={id} reason=unknown_item");
                continue;
            }
            if price < 0 {
                warn!("prices_user_skip item={id} reason=negative");
                continue;
            }
            book.prices.insert(id, Zeny(price));
            applied += 1;
        }
        book.source = PriceSource::User;
        info!("prices_loaded source=user overrides={applied}");
        book
    }

    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Price of `id`, zero when nobody priced it.
    pub fn get(&self, id: ItemId) -> Zeny {
        self.prices.get(&id).copied().unwrap_or(Zeny::ZERO)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// In-memory edit; nothing touches disk until [`PriceBook::save`].
    pub fn set_live(
        &mut self,
        catalog: &CatalogStore,
        id: ItemId,
        price: i64,
    ) -> Result<(), PriceError> {
        catalog.get_item(id)?;
        if price < 0 {
            return Err(ValidationError::Negative {
                field: "price",
                value: price,
            }
            .into());
        }
        self.prices.insert(id, Zeny(price));
        self.source = PriceSource::Live;
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<(), PriceError> {
        write_json_atomic(path, &self.to_file_map()).map_err(|source| PriceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.source = PriceSource::User;
        info!("prices_saved path={} items={}", path.display(), self.prices.len());
        Ok(())
    }

    /// Writes the packaged defaults over the user file and adopts them.
    pub fn reset(&mut self, catalog: &CatalogStore, path: &Path) -> Result<(), PriceError> {
        *self = Self::defaults(catalog);
        write_json_atomic(path, &self.to_file_map()).map_err(|source| PriceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("prices_reset path={}", path.display());
        Ok(())
    }

    /// Priced items, sorted by case-folded name, then id.
    pub fn rows(&self, catalog: &CatalogStore) -> Vec<PriceRow> {
        let mut rows: Vec<PriceRow> = self
            .prices
            .iter()
            .map(|(id, price)| PriceRow {
                item_id: *id,
                name: catalog
                    .get_item(*id)
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|_| format!("#{id}")),
                price: *price,
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.name.to_lowercase(), a.item_id).cmp(&(b.name.to_lowercase(), b.item_id))
        });
        rows
    }

    fn to_file_map(&self) -> BTreeMap<String, i64> {
        self.prices
            .iter()
            .map(|(id, price)| (id.to_string(), price.as_i64()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::catalog::CatalogPaths;

    fn shipped_store() -> CatalogStore {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(Path::parent)
            .expect("workspace root")
            .join("assets");
        CatalogStore::load(&CatalogPaths::under(&assets)).expect("load catalog")
    }

    #[test]
    fn user_file_overlays_defaults() {
        let catalog = shipped_store();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, r#"{"507": 30, "999999": 5, "508": -1, "herb": 2}"#).unwrap();

        let book = PriceBook::load(&catalog, &path);
        assert_eq!(book.source(), PriceSource::User);
        assert_eq!(book.get(ItemId(507)), Zeny(30));
        assert_eq!(book.get(ItemId(508)), Zeny(70));
        assert_eq!(book.len(), catalog.default_prices().len());
    }

    #[test]
    fn broken_user_file_keeps_defaults() {
        let catalog = shipped_store();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, "[1, 2").unwrap();
        let book = PriceBook::load(&catalog, &path);
        assert_eq!(book, PriceBook::defaults(&catalog));
    }

    #[test]
    fn live_edits_save_and_reload() {
        let catalog = shipped_store();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prices.json");
        let mut book = PriceBook::load(&catalog, &path);
        assert_eq!(book.source(), PriceSource::Default);

        book.set_live(&catalog, ItemId(713), 5).unwrap();
        assert_eq!(book.source(), PriceSource::Live);
        assert!(matches!(
            book.set_live(&catalog, ItemId(713), -5),
            Err(PriceError::Validation(ValidationError::Negative { .. }))
        ));
        assert!(matches!(
            book.set_live(&catalog, ItemId(1), 5),
            Err(PriceError::NotFound(NotFound::Item(ItemId(1))))
        ));

        book.save(&path).unwrap();
        let reloaded = PriceBook::load(&catalog, &path);
        assert_eq!(reloaded.get(ItemId(713)), Zeny(5));

        book.reset(&catalog, &path).unwrap();
        assert_eq!(PriceBook::load(&catalog, &path).get(ItemId(713)), Zeny(3));
    }

    #[test]
    fn rows_sort_by_name() {
        let catalog = shipped_store();
        let rows = PriceBook::defaults(&catalog).rows(&catalog);
        let names: Vec<String> = rows.iter().map(|row| row.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
