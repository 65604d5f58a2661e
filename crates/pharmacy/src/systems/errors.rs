use std::path::PathBuf;

use thiserror::Error;

use super::catalog::ItemId;

/// Fatal start-up failures: the assets on disk cannot be turned into a catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to hash rule pack: {0}")]
    Hash(#[source] serde_json::Error),
    #[error("{path}: unsupported catalog shape ({found})")]
    UnsupportedShape { path: PathBuf, found: &'static str },
    #[error("{path}: unsupported schema {schema:?}")]
    UnsupportedSchema { path: PathBuf, schema: String },
    #[error("item {item}: duplicate catalog entry")]
    DuplicateItem { item: ItemId },
    #[error("item {item}: no display name")]
    MissingName { item: ItemId },
    #[error("item {item}: invalid recipe chunk {chunk:?}")]
    InvalidRecipe { item: ItemId, chunk: String },
    #[error("item {item}: recipe references unknown ingredient {ingredient}")]
    DanglingIngredient { item: ItemId, ingredient: ItemId },
    #[error("{section}: unknown item {item}")]
    UnknownItem { section: &'static str, item: String },
    #[error("{section}: {reason}")]
    Invalid { section: &'static str, reason: String },
}

/// Attribute input the formula refuses to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {raw:?} is not an integer")]
    NotAnInteger { field: &'static str, raw: String },
    #[error("{field}: {value} is negative")]
    Negative { field: &'static str, value: i64 },
    #[error("{field}: {value} outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Lookup misses. Callers treat these as "no data available".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("no item {0}")]
    Item(ItemId),
    #[error("no recipe for item {0}")]
    Recipe(ItemId),
    #[error("no rules for skill level {0}")]
    Level(u8),
    #[error("no buff {0:?}")]
    Buff(String),
    #[error("no item named {0:?}")]
    Name(String),
}

/// Umbrella error for callers that touch more than one subsystem.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
}
