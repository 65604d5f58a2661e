use std::fs;
use std::path::{Path, PathBuf};

use super::{CatalogPaths, CatalogStore};

mod item_shapes;

fn workspace_path(relative: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    root.join(relative)
}

fn shipped_store() -> CatalogStore {
    CatalogStore::load(&CatalogPaths::under(&workspace_path("assets"))).expect("load catalog")
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

/// One-item rule pack for hand-built catalogs.
const SMALL_RULEPACK: &str = r#"
[formula]
skill_roll = { min = 30, max = 150 }
protection_roll = { min = 4, max = 10 }
potion_research_weight = 5
base_level_pivot = 100
dex_divisor = 2

[limits]
pharmacy_level = { min = 1, max = 1 }

[levels]
base_difficulty = { "1" = 100 }
max_potions = { "1" = 3 }

[yield]
floor_label = "LOW"
floor_penalty = 2
bands = [{ label = "TOP", offset = 0, penalty = 0 }]

[items]
"100" = 5
"#;
