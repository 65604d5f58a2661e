pub mod cli;
pub mod commands;
pub mod logs;
pub mod paths;
pub mod report;
pub mod systems;

pub use cli::CliOptions;
pub use systems::catalog::{CatalogPaths, CatalogStore};
pub use systems::{CalcError, ConfigError, NotFound, ValidationError};
