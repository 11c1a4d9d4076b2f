//! Win-day evaluation: goals, daily logs, and whether today counts as won.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Free text describing what makes a day "won" for this goal.
    #[serde(default)]
    pub win_condition: Option<String>,
    pub status: GoalStatus,
}

impl Goal {
    /// A win condition that is present and not blank.
    pub fn win_condition(&self) -> Option<&str> {
        self.win_condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn has_win_condition(&self) -> bool {
        self.win_condition().is_some()
    }
}

/// One user's record of one day, optionally scoped to a goal.
///
/// `(user_id, date, goal_id)` is unique; the store enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub goal_id: Option<String>,
    /// Ids of the acceptance criteria ticked off.
    #[serde(default)]
    pub criteria_met: Vec<String>,
    pub day_won: bool,
    #[serde(default)]
    pub win_condition_met: Option<bool>,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub planned_next_day: bool,
    pub created_at: DateTime<FixedOffset>,
}

pub const REASON_NO_LOG: &str = "No log recorded for today";
pub const REASON_NO_WIN_CONDITION: &str = "No win condition set";
pub const REASON_MET: &str = "Win condition met";
pub const REASON_NOT_MET: &str = "Win condition not met";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinStatus {
    pub won: bool,
    pub can_win: bool,
    pub reason: String,
}

/// Day-won verdict for today's log against its goal.
///
/// With a win condition in place the day is won only when the log says so
/// AND the condition was explicitly marked met; an unanswered condition
/// (`None`) is not met.
pub fn calculate_win_status(daily_log: Option<&DailyLog>, goal: Option<&Goal>) -> WinStatus {
    let has_condition = goal.is_some_and(Goal::has_win_condition);

    let Some(log) = daily_log else {
        return WinStatus {
            won: false,
            can_win: has_condition,
            reason: REASON_NO_LOG.to_string(),
        };
    };

    if !has_condition {
        return WinStatus {
            won: log.day_won,
            can_win: false,
            reason: REASON_NO_WIN_CONDITION.to_string(),
        };
    }

    let won = log.day_won && log.win_condition_met == Some(true);
    WinStatus {
        won,
        can_win: true,
        reason: if won { REASON_MET } else { REASON_NOT_MET }.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(condition: Option<&str>) -> Goal {
        Goal {
            id: "g1".into(),
            user_id: "u1".into(),
            title: "Ship the thesis".into(),
            win_condition: condition.map(str::to_string),
            status: GoalStatus::Active,
        }
    }

    fn daily(day_won: bool, win_condition_met: Option<bool>) -> DailyLog {
        DailyLog {
            id: "d1".into(),
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            goal_id: Some("g1".into()),
            criteria_met: vec![],
            day_won,
            win_condition_met,
            reflection: None,
            planned_next_day: false,
            created_at: DateTime::parse_from_rfc3339("2026-10-19T21:00:00-05:00").unwrap(),
        }
    }

    #[test]
    fn test_no_log_with_condition() {
        let s = calculate_win_status(None, Some(&goal(Some("X"))));
        assert!(!s.won);
        assert!(s.can_win);
        assert_eq!(s.reason, REASON_NO_LOG);
    }

    #[test]
    fn test_no_log_no_goal() {
        let s = calculate_win_status(None, None);
        assert_eq!(s, WinStatus { won: false, can_win: false, reason: REASON_NO_LOG.into() });
    }

    #[test]
    fn test_log_without_condition_uses_log_verdict() {
        let s = calculate_win_status(Some(&daily(true, None)), Some(&goal(None)));
        assert!(s.won);
        assert!(!s.can_win);
        assert_eq!(s.reason, REASON_NO_WIN_CONDITION);

        // blank text is no condition at all
        let s = calculate_win_status(Some(&daily(false, None)), Some(&goal(Some("   "))));
        assert!(!s.won);
        assert!(!s.can_win);
    }

    #[test]
    fn test_condition_met() {
        let s = calculate_win_status(Some(&daily(true, Some(true))), Some(&goal(Some("X"))));
        assert_eq!(s, WinStatus { won: true, can_win: true, reason: REASON_MET.into() });
    }

    #[test]
    fn test_condition_not_met_or_unanswered() {
        for met in [Some(false), None] {
            let s = calculate_win_status(Some(&daily(true, met)), Some(&goal(Some("X"))));
            assert!(!s.won, "{met:?}");
            assert!(s.can_win);
            assert_eq!(s.reason, REASON_NOT_MET);
        }
        // condition met but the day itself not marked won
        let s = calculate_win_status(Some(&daily(false, Some(true))), Some(&goal(Some("X"))));
        assert!(!s.won);
    }

    #[test]
    fn test_daily_log_row_defaults() {
        let row = r#"{"id":"d1","user_id":"u1","date":"2026-10-19","day_won":true,
            "created_at":"2026-10-19T21:00:00Z"}"#;
        let log: DailyLog = serde_json::from_str(row).unwrap();
        assert!(log.goal_id.is_none());
        assert!(log.criteria_met.is_empty());
        assert_eq!(log.win_condition_met, None);
    }
}
