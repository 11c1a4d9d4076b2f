use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

/// `$LUMEN_HOME`, or `~/.lumen`.
pub fn lumen_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("LUMEN_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".lumen"))
}

pub fn ensure_lumen_home() -> Result<PathBuf> {
    let dir = lumen_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn in_home(path: Option<&PathBuf>, fallback: &str) -> Result<PathBuf> {
    let home = ensure_lumen_home()?;
    Ok(match path {
        Some(p) if p.is_absolute() => p.clone(),
        Some(p) => home.join(p),
        None => home.join(fallback),
    })
}

/// Snapshot file: `--data`, then `[store].data_file`, then `<home>/lumen.json`.
pub fn data_path(cfg: &Config, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(p) => Ok(p),
        None => in_home(cfg.store.data_file.as_ref(), "lumen.json"),
    }
}

/// Where `sync` appends delivered writes.
pub fn outbox_path(cfg: &Config, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(p) => Ok(p),
        None => in_home(cfg.sync.outbox_file.as_ref(), "outbox.jsonl"),
    }
}
