//! The `LogStore` trait: what the engine needs from a storage backend.
//!
//! Backends (e.g. `lumen-store`) implement it; the CLI depends on this
//! abstraction only. Writes take `&mut self`, so the check-then-write of an
//! upsert cannot interleave with another write through the same handle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::acceptance::{AcceptanceCriterion, DayType};
use crate::habit::{Habit, HabitLog};
use crate::task::Task;
use crate::win::{DailyLog, Goal};

/// Input to [`LogStore::upsert_daily_log`]. The key is `(user_id, date, goal_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertDailyLog {
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub criteria_met: Vec<String>,
    pub day_won: bool,
    #[serde(default)]
    pub win_condition_met: Option<bool>,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub planned_next_day: bool,
}

impl UpsertDailyLog {
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            goal_id: None,
            criteria_met: Vec::new(),
            day_won: false,
            win_condition_met: None,
            reflection: None,
            planned_next_day: false,
        }
    }

    pub fn for_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    pub fn won(mut self, day_won: bool, win_condition_met: Option<bool>) -> Self {
        self.day_won = day_won;
        self.win_condition_met = win_condition_met;
        self
    }

    pub fn with_criteria_met(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.criteria_met = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `log` has this upsert's key.
    pub fn matches(&self, log: &DailyLog) -> bool {
        log.user_id == self.user_id && log.date == self.date && log.goal_id == self.goal_id
    }
}

/// Storage collaborator consumed by the engine.
///
/// Reads return snapshots; nothing handed out is live. Implementations must
/// keep at most one daily log per `(user_id, date, goal_id)`.
pub trait LogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Habit logs, optionally for a single habit.
    fn list_habit_logs(&self, habit_id: Option<&str>) -> Result<Vec<HabitLog>, Self::Error>;

    /// Daily logs of a user; `goal_id` narrows to one goal's rows.
    fn list_daily_logs(
        &self,
        user_id: &str,
        goal_id: Option<&str>,
    ) -> Result<Vec<DailyLog>, Self::Error>;

    /// The daily log with exactly this key, if any. `goal_id = None` matches
    /// only rows without a goal.
    fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
        goal_id: Option<&str>,
    ) -> Result<Option<DailyLog>, Self::Error>;

    /// Checklist for one day type, in `order_index` order.
    fn list_acceptance_criteria(
        &self,
        user_id: &str,
        day_type: DayType,
    ) -> Result<Vec<AcceptanceCriterion>, Self::Error>;

    /// Create the daily log if its key is new, otherwise overwrite its fields
    /// (last writer wins). Returns the stored row.
    fn upsert_daily_log(&mut self, params: UpsertDailyLog) -> Result<DailyLog, Self::Error>;

    fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>, Self::Error>;

    /// Tasks with their horizon re-derived against `today`.
    fn list_tasks(&self, user_id: &str, today: NaiveDate) -> Result<Vec<Task>, Self::Error>;

    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>, Self::Error>;
}
