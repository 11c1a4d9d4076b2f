//! Horizon classifier: due date → urgency bucket.
//!
//! Buckets:
//! - 2-day: due in two days or fewer (overdue included)
//! - 7-day: due within a week
//! - future: later, or no due date
//!
//! A task the classifier puts in 2-day cannot be moved to a calmer bucket by
//! hand; only changing its due date moves it. The "no new future work while
//! anything is 2-day" rule belongs to the caller; [`HorizonBuckets`] only
//! reports the counts it needs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskHorizon};
use crate::time::days_difference;

const TWO_DAY_LIMIT: i64 = 2;
const SEVEN_DAY_LIMIT: i64 = 7;

pub fn calculate_horizon(due_date: Option<NaiveDate>, today: NaiveDate) -> TaskHorizon {
    let Some(due) = due_date else {
        return TaskHorizon::Future;
    };

    match days_difference(due, today) {
        d if d <= TWO_DAY_LIMIT => TaskHorizon::TwoDay,
        d if d <= SEVEN_DAY_LIMIT => TaskHorizon::SevenDay,
        _ => TaskHorizon::Future,
    }
}

/// Whether `task` may be placed in `new_horizon` by hand.
///
/// Only rejected when the computed horizon is 2-day and the target is not.
pub fn is_valid_horizon_transition(task: &Task, new_horizon: TaskHorizon, today: NaiveDate) -> bool {
    let computed = calculate_horizon(task.due_date, today);
    !(computed == TaskHorizon::TwoDay && new_horizon != TaskHorizon::TwoDay)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonStatus {
    pub blocked: bool,
    pub warning: bool,
    pub count: usize,
}

/// Open tasks grouped by freshly computed horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HorizonBuckets {
    pub two_day: Vec<Task>,
    pub seven_day: Vec<Task>,
    pub future: Vec<Task>,
}

impl HorizonBuckets {
    /// Group the open tasks; completed tasks are skipped. Stored horizons are
    /// not trusted, each task is reclassified against `today`.
    pub fn from_tasks(tasks: &[Task], today: NaiveDate) -> Self {
        let mut buckets = Self::default();
        for task in tasks.iter().filter(|t| !t.completed) {
            let mut task = task.clone();
            task.refresh_horizon(today);
            buckets.bucket_mut(task.horizon).push(task);
        }
        buckets
    }

    pub fn bucket(&self, horizon: TaskHorizon) -> &[Task] {
        match horizon {
            TaskHorizon::TwoDay => &self.two_day,
            TaskHorizon::SevenDay => &self.seven_day,
            TaskHorizon::Future => &self.future,
        }
    }

    fn bucket_mut(&mut self, horizon: TaskHorizon) -> &mut Vec<Task> {
        match horizon {
            TaskHorizon::TwoDay => &mut self.two_day,
            TaskHorizon::SevenDay => &mut self.seven_day,
            TaskHorizon::Future => &mut self.future,
        }
    }

    pub fn count(&self, horizon: TaskHorizon) -> usize {
        self.bucket(horizon).len()
    }

    pub fn has_two_day_tasks(&self) -> bool {
        !self.two_day.is_empty()
    }

    /// Future work is blocked while anything is due within two days.
    pub fn is_future_blocked(&self) -> bool {
        self.has_two_day_tasks()
    }

    pub fn can_add_to_horizon(&self, horizon: TaskHorizon) -> bool {
        !(horizon == TaskHorizon::Future && self.is_future_blocked())
    }

    pub fn status(&self, horizon: TaskHorizon) -> HorizonStatus {
        let count = self.count(horizon);
        match horizon {
            TaskHorizon::TwoDay => HorizonStatus { blocked: false, warning: count > 0, count },
            TaskHorizon::Future => HorizonStatus {
                blocked: self.is_future_blocked(),
                warning: false,
                count,
            },
            TaskHorizon::SevenDay => HorizonStatus { blocked: false, warning: false, count },
        }
    }
}
