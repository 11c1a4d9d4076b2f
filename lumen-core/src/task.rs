//! Task model.
//!
//! `horizon` is a cache of [`calculate_horizon`](crate::horizon::calculate_horizon)
//! for the task's due date. It goes stale as days pass, so anything reading a
//! stored task calls [`Task::refresh_horizon`] first.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::horizon::calculate_horizon;

/// Urgency bucket of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskHorizon {
    /// Due within two days, or overdue.
    #[serde(rename = "2-day")]
    TwoDay,
    /// Due within a week.
    #[serde(rename = "7-day")]
    SevenDay,
    /// Later, or no due date.
    #[serde(rename = "future")]
    Future,
}

impl TaskHorizon {
    pub const ALL: [TaskHorizon; 3] = [Self::TwoDay, Self::SevenDay, Self::Future];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoDay => "2-day",
            Self::SevenDay => "7-day",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for TaskHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskHorizon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2-day" => Ok(Self::TwoDay),
            "7-day" => Ok(Self::SevenDay),
            "future" => Ok(Self::Future),
            other => Err(Error::UnknownHorizon(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub goal_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_horizon")]
    pub horizon: TaskHorizon,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
}

fn default_horizon() -> TaskHorizon {
    TaskHorizon::Future
}

impl Task {
    /// New open task with no due date.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            goal_id: None,
            title: title.into(),
            due_date: None,
            horizon: TaskHorizon::Future,
            notes: String::new(),
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    /// Set the due date and re-derive the horizon against `today`.
    pub fn with_due_date(mut self, due_date: NaiveDate, today: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self.refresh_horizon(today);
        self
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    /// Bring the cached horizon in line with the due date as of `today`.
    /// Returns `true` when the cached value changed.
    pub fn refresh_horizon(&mut self, today: NaiveDate) -> bool {
        let fresh = calculate_horizon(self.due_date, today);
        let changed = fresh != self.horizon;
        self.horizon = fresh;
        changed
    }
}
