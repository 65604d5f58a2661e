use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::systems::catalog::CatalogPaths;
use crate::systems::profile::ProfileStore;

/// Asset directory: explicit override, then `./assets`, then the workspace copy.
pub fn resolve_assets(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let direct = PathBuf::from("assets");
    if direct.is_dir() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

/// Per-user data directory for `profile.json` and `prices.json`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let project_dirs = ProjectDirs::from("", "", "pharmacy")
        .context("could not determine a user data directory; pass --data-dir")?;
    Ok(project_dirs.data_dir().to_path_buf())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub assets: PathBuf,
    pub data: PathBuf,
}

impl AppPaths {
    pub fn resolve(assets: Option<&Path>, data: Option<&Path>) -> Result<Self> {
        Ok(Self {
            assets: resolve_assets(assets),
            data: resolve_data_dir(data)?,
        })
    }

    pub fn catalog(&self) -> CatalogPaths {
        CatalogPaths::under(&self.assets)
    }

    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(
            self.data.join("profile.json"),
            self.assets.join("defaults").join("profile.default.json"),
        )
    }

    pub fn user_prices(&self) -> PathBuf {
        self.data.join("prices.json")
    }
}
