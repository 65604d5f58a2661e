use std::path::{Path, PathBuf};

use super::{AttributeSet, FormulaConstants, RawAttributes, RollRange};
use crate::systems::catalog::{ItemId, Recipe};

mod distribution_bands;
mod rng_discipline;

fn workspace_path(relative: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    root.join(relative)
}

fn default_formula() -> FormulaConstants {
    FormulaConstants {
        skill_roll: RollRange::new(30, 150).unwrap(),
        protection_roll: RollRange::new(4, 10).unwrap(),
        potion_research_weight: 5,
        base_level_pivot: 100,
        dex_divisor: 2,
    }
}

fn recipe(difficulty: i64) -> Recipe {
    Recipe {
        output: ItemId(12428),
        materials: Vec::new(),
        difficulty,
        formula: default_formula(),
    }
}

fn reference_raw() -> RawAttributes {
    RawAttributes {
        intelligence: 99,
        dexterity: 90,
        luck: 10,
        base_level: 99,
        job_level: 10,
        potion_research: 10,
        chemical_protection: 5,
        pharmacy_level: 10,
    }
}

fn reference_attrs() -> AttributeSet {
    reference_raw().validate(&Default::default()).unwrap()
}
