//! JSON snapshot file: every collection the store holds, plus the outbox.
//!
//! The file is rewritten whole on save (temp file + rename), which is fine
//! for one person's history.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use lumen_core::{AcceptanceCriterion, DailyLog, Goal, Habit, HabitLog, Task};

use crate::error::{Result, StoreError};
use crate::outbox::Outbox;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub habit_logs: Vec<HabitLog>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    #[serde(default)]
    pub daily_logs: Vec<DailyLog>,
    #[serde(default)]
    pub outbox: Outbox,
}

impl Snapshot {
    /// Read a snapshot; a missing file is an empty snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot yet; starting empty");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| StoreError::io("read", path, e))?;
        let snapshot: Self = serde_json::from_str(&raw)?;
        snapshot.validate()?;

        debug!(
            path = %path.display(),
            habit_logs = snapshot.habit_logs.len(),
            daily_logs = snapshot.daily_logs.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io("create", dir, e))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io("write", &tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io("rename", path, e))?;

        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }

    /// At most one daily log per `(user, date, goal)`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for log in &self.daily_logs {
            let key = (log.user_id.as_str(), log.date, log.goal_id.as_deref());
            if !seen.insert(key) {
                return Err(StoreError::DuplicateDailyLog {
                    user_id: log.user_id.clone(),
                    date: log.date,
                    goal_id: log.goal_id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};

    fn daily(id: &str, goal: Option<&str>) -> DailyLog {
        DailyLog {
            id: id.into(),
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            goal_id: goal.map(str::to_string),
            criteria_met: vec![],
            day_won: true,
            win_condition_met: Some(true),
            reflection: None,
            planned_next_day: false,
            created_at: DateTime::parse_from_rfc3339("2026-10-19T21:00:00Z").unwrap(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = Snapshot::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(s, Snapshot::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lumen.json");

        let snapshot = Snapshot {
            daily_logs: vec![daily("a", None), daily("b", Some("g1"))],
            ..Default::default()
        };
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded.daily_logs.len(), 2);
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_duplicate_daily_log_rejected() {
        let snapshot = Snapshot {
            daily_logs: vec![daily("a", Some("g1")), daily("b", Some("g1"))],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(StoreError::DuplicateDailyLog { .. })
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.json");
        std::fs::write(&path, r#"{"goals": []}"#).unwrap();
        let s = Snapshot::load(&path).unwrap();
        assert!(s.outbox.is_empty());
        assert!(s.habit_logs.is_empty());
    }
}
