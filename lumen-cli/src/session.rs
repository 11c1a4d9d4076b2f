//! Per-invocation state: config, the resolved "today", and the opened store.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use lumen_core::today_in;
use lumen_store::{MemoryStore, Snapshot};

use crate::config::{load_config, Config};
use crate::state::data_path;

pub struct Session {
    pub cfg: Config,
    pub today: NaiveDate,
    pub data_path: PathBuf,
    pub store: MemoryStore,
    json: bool,
}

impl Session {
    pub fn open(data: Option<PathBuf>, today: Option<NaiveDate>, json: bool) -> Result<Self> {
        let cfg = load_config()?;

        let today = match today {
            Some(d) => d,
            None => today_in(&cfg.profile.timezone, Utc::now())
                .with_context(|| format!("[profile].timezone = {:?}", cfg.profile.timezone))?,
        };

        let data_path = data_path(&cfg, data)?;
        let snapshot = Snapshot::load(&data_path)
            .with_context(|| format!("load {}", data_path.display()))?;
        let store = MemoryStore::from_snapshot(snapshot)
            .with_context(|| format!("open {}", data_path.display()))?;

        debug!(%today, data = %data_path.display(), user = %cfg.profile.user_id, "session opened");
        Ok(Self {
            cfg,
            today,
            data_path,
            store,
            json,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.cfg.profile.user_id
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .snapshot()
            .save(&self.data_path)
            .with_context(|| format!("save {}", self.data_path.display()))
    }

    /// Print `value` as JSON under `--json`, otherwise run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

/// Next sequential id for `prefix`: one past the highest `prefix-NNNN` in use.
/// Ids that do not follow the pattern are ignored.
pub fn next_id<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}-{:04}", highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_skips_past_gaps() {
        assert_eq!(next_id("task", []), "task-0001");
        // task-0002 was deleted; counting rows would hand out task-0003 again
        assert_eq!(next_id("task", ["task-0001", "task-0003"]), "task-0004");
        assert_eq!(next_id("goal", ["goal-0009", "imported-x", "goal-abc", "task-0100"]), "goal-0010");
    }
}
