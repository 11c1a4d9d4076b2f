//! Acceptance criteria and the day-completion gate.
//!
//! Each day type carries its own checklist. A day can be closed only when
//! every criterion of the active day type is ticked; an empty checklist never
//! closes a day.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::win::DailyLog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    #[default]
    Standard,
    LaundryDay,
    GymDay,
}

impl DayType {
    pub const ALL: [DayType; 3] = [Self::Standard, Self::LaundryDay, Self::GymDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LaundryDay => "laundry_day",
            Self::GymDay => "gym_day",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Self::Standard),
            "laundry_day" | "laundry" => Ok(Self::LaundryDay),
            "gym_day" | "gym" => Ok(Self::GymDay),
            _ => Err(Error::UnknownDayType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub id: String,
    pub user_id: String,
    pub criteria_text: String,
    pub day_type: DayType,
    /// Display order; ties fall back to id.
    pub order_index: i32,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCompletionStatus {
    pub day_type: DayType,
    pub total_criteria: usize,
    pub completed_criteria: usize,
    /// Unticked criteria in display order.
    pub missing_criteria: Vec<AcceptanceCriterion>,
    pub all_criteria_met: bool,
    pub can_close_day: bool,
}

/// Evaluate today's checklist for `day_type`.
///
/// Criteria of other day types are ignored, as are ids in
/// `criteria_met` that do not belong to the active checklist.
pub fn evaluate_day_completion(
    criteria: &[AcceptanceCriterion],
    day_type: DayType,
    daily_log: Option<&DailyLog>,
) -> DayCompletionStatus {
    let mut active: Vec<&AcceptanceCriterion> =
        criteria.iter().filter(|c| c.day_type == day_type).collect();
    active.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));

    let met: HashSet<&str> = daily_log
        .map(|l| l.criteria_met.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let total = active.len();
    let (done, missing): (Vec<&AcceptanceCriterion>, Vec<&AcceptanceCriterion>) =
        active.into_iter().partition(|c| met.contains(c.id.as_str()));

    let completed = done.len();
    let all_met = total > 0 && completed == total;

    DayCompletionStatus {
        day_type,
        total_criteria: total,
        completed_criteria: completed,
        missing_criteria: missing.into_iter().cloned().collect(),
        all_criteria_met: all_met,
        can_close_day: all_met,
    }
}
