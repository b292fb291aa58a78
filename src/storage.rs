//! JSON persistence for budgets.
//!
//! One budget per file. Writes land in a staging file beside the target and
//! are swapped in with a rename, so a crash mid-write never corrupts the
//! previous copy. The schema-version guard lives in the budget's own
//! deserializer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::Result;
use crate::ledger::{Budget, SCHEMA_VERSION};

const DEFAULT_DIR_NAME: &str = ".budget_engine";
const BUDGET_DIR: &str = "budgets";

/// Application data directory, defaulting to `~/.budget_engine`. The
/// `BUDGET_ENGINE_HOME` environment variable overrides it.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = std::env::var_os("BUDGET_ENGINE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Canonical file path for a budget, derived from the budget itself.
pub fn budget_path(budget: &Budget) -> PathBuf {
    app_data_dir()
        .join(BUDGET_DIR)
        .join(format!("{}.json", file_stem_for(budget)))
}

pub fn save_budget(budget: &Budget, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(budget)?;
    let staging = staging_path(path);
    fs::write(&staging, json)?;
    fs::rename(&staging, path)?;
    info!(path = %path.display(), "saved budget");
    Ok(())
}

pub fn load_budget(path: &Path) -> Result<Budget> {
    let data = fs::read_to_string(path)?;
    let budget: Budget = serde_json::from_str(&data)?;
    info!(path = %path.display(), "loaded budget");
    Ok(budget)
}

/// File stem built from the budget's name; a budget whose name has nothing
/// usable in it falls back to its id.
fn file_stem_for(budget: &Budget) -> String {
    let mut stem = String::new();
    let mut gap = false;
    for ch in budget.name().trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !stem.is_empty() {
                stem.push('-');
            }
            stem.push(ch.to_ascii_lowercase());
            gap = false;
        } else {
            gap = true;
        }
    }
    if stem.is_empty() {
        match budget.id() {
            Some(id) => format!("budget-{id}"),
            None => "budget".into(),
        }
    } else {
        stem
    }
}

/// Hidden sibling of the target, tagged with the schema version being
/// written so a leftover from an older build is recognizable.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("budget.json");
    target.with_file_name(format!(".{name}.v{}-staging", SCHEMA_VERSION.major))
}
