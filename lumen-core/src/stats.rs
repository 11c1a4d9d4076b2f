//! Aggregate win/loss reporting over a user's daily logs.
//!
//! The win streak reuses [`streak_from_days`]: a day is won when any of its
//! rows (one per goal when unfiltered) is marked won, and the chain must be
//! unbroken calendar days, weekends included. A logged-but-lost day and an
//! unlogged day break it the same way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::streak::streak_from_days;
use crate::time::days_ago;
use crate::win::DailyLog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub won: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current: u32,
    pub best: u32,
    /// One entry per log row, newest first.
    pub history: Vec<DayOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinStats {
    pub total_days: usize,
    pub won_days: usize,
    /// Percent with one decimal.
    pub win_rate: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Oldest first.
    pub last_7_days: Vec<bool>,
    pub last_30_days: Vec<bool>,
}

pub fn calculate_win_streak(logs: &[DailyLog], today: NaiveDate) -> StreakData {
    let streak = streak_from_days(logs.iter().filter(|l| l.day_won).map(|l| l.date), today);

    let mut history: Vec<DayOutcome> = logs
        .iter()
        .map(|l| DayOutcome { date: l.date, won: l.day_won })
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    StreakData {
        current: streak.current_streak,
        best: streak.longest_streak,
        history,
    }
}

/// Win rate, streaks and trailing series. Rows are taken as given: the store
/// guarantees one row per (user, date, goal).
pub fn calculate_win_stats(logs: &[DailyLog], today: NaiveDate) -> WinStats {
    let total_days = logs.len();
    let won_days = logs.iter().filter(|l| l.day_won).count();
    let win_rate = if total_days > 0 {
        (won_days as f64 / total_days as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let streak = calculate_win_streak(logs, today);

    let stats = WinStats {
        total_days,
        won_days,
        win_rate,
        current_streak: streak.current,
        best_streak: streak.best,
        last_7_days: trailing_series(logs, today, 7),
        last_30_days: trailing_series(logs, today, 30),
    };

    debug!(
        total_days,
        won_days,
        win_rate,
        current_streak = stats.current_streak,
        "computed win stats"
    );

    stats
}

/// `day_won` of every row dated on or after `today - days`, oldest first.
fn trailing_series(logs: &[DailyLog], today: NaiveDate, days: u32) -> Vec<bool> {
    let cutoff = days_ago(today, days);
    let mut recent: Vec<&DailyLog> = logs.iter().filter(|l| l.date >= cutoff).collect();
    recent.sort_by_key(|l| l.date);
    recent.into_iter().map(|l| l.day_won).collect()
}
