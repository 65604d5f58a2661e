use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::systems::workbench::PharmacySnapshot;

const DIR_ENV: &str = "PHARMACY_QUERY_LOG_DIR";

#[derive(Serialize)]
pub struct QueryLog<'a> {
    pub command: &'a str,
    pub snapshot: &'a PharmacySnapshot,
}

fn ensure_log_dir() -> Result<PathBuf> {
    let path = env::var_os(DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs/queries"));
    if !path.exists() {
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    Ok(path)
}

fn append_json_line<T: Serialize>(file: &str, payload: &T) -> Result<()> {
    let dir = ensure_log_dir()?;
    let path = dir.join(file);
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("unable to open log {}", path.display()))?;
    let line = serde_json::to_string(payload)?;
    handle
        .write_all(line.as_bytes())
        .and_then(|_| handle.write_all(b"\n"))
        .with_context(|| format!("unable to write log {}", path.display()))?;
    Ok(())
}

pub fn write_query(log: QueryLog<'_>) -> Result<()> {
    append_json_line("pharmacy.jsonl", &log)
}
