//! Habit and habit-log records as handed over by the storage layer.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::time::hhmm_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Daily,
    Weekly,
    Custom,
}

impl HabitFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::UnknownFrequency(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub goal_id: Option<String>,
    pub name: String,
    pub frequency: HabitFrequency,
    /// Ordered reminder slots, `HH:MM` on the wire.
    #[serde(default, with = "hhmm_list")]
    pub reminder_times: Vec<NaiveTime>,
    #[serde(default)]
    pub icon: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

/// One completion (or explicit non-completion) of a habit.
///
/// `logged_at` keeps the offset it was recorded in; time-of-day analytics read
/// the wall-clock time from it. `date` is the calendar day the log counts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    pub logged_at: DateTime<FixedOffset>,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl HabitLog {
    /// A completed log whose `date` is the day of `logged_at`.
    pub fn completed_at(
        id: impl Into<String>,
        habit_id: impl Into<String>,
        user_id: impl Into<String>,
        logged_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            habit_id: habit_id.into(),
            user_id: user_id.into(),
            date: logged_at.date_naive(),
            logged_at,
            completed: true,
            notes: None,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
