//! Completion analytics for habits: trailing completion rate, the per-habit
//! stats roll-up, and time-of-day patterns used to place reminders.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::habit::HabitLog;
use crate::streak::calculate_streak;
use crate::time::{self, hhmm, hhmm_list};

pub const DEFAULT_COMPLETION_WINDOW_DAYS: u32 = 30;

/// Pattern analysis needs at least this many completed logs.
pub const MIN_PATTERN_SAMPLES: usize = 3;

/// Above this spread (minutes) a completion pattern is too noisy to drive reminders.
pub const DEFAULT_MAX_REMINDER_VARIANCE_MINUTES: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Percent, 0..=100.
    pub completion_rate: u32,
    pub total_completions: usize,
    pub last_completed_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionPattern {
    pub habit_id: String,
    #[serde(with = "hhmm")]
    pub average_completion_time: NaiveTime,
    /// Up to three most frequent exact times, most frequent first.
    #[serde(with = "hhmm_list")]
    pub common_completion_times: Vec<NaiveTime>,
    /// Population standard deviation of the completion minute-of-day, rounded.
    pub completion_time_variance: u32,
    pub sample_size: usize,
}

/// Percentage of logs in the trailing window that are completions.
///
/// The window is exactly `window_days` calendar days ending with `today`.
/// The denominator is `min(window_days, logs in window)` rather than the
/// window length, so a habit created last week is not scored against thirty
/// empty days. Returns 0 when the window holds no logs.
pub fn calculate_completion_rate(logs: &[HabitLog], window_days: u32, today: NaiveDate) -> u32 {
    debug_assert!(window_days > 0, "completion window must be at least one day");
    if window_days == 0 {
        return 0;
    }

    let cutoff = time::days_ago(today, window_days - 1);
    let recent: Vec<&HabitLog> = logs.iter().filter(|l| l.date >= cutoff).collect();
    if recent.is_empty() {
        return 0;
    }

    let completed = recent.iter().filter(|l| l.completed).count();
    let denominator = (window_days as usize).min(recent.len());
    let rate = (completed as f64 / denominator as f64 * 100.0).round();

    rate.min(100.0) as u32
}

/// Streaks, completion rate and totals for one habit.
pub fn calculate_habit_stats(
    habit_id: &str,
    logs: &[HabitLog],
    window_days: u32,
    today: NaiveDate,
) -> HabitStats {
    let streak = calculate_streak(logs, today);
    let completed = logs.iter().filter(|l| l.completed);

    HabitStats {
        habit_id: habit_id.to_string(),
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        completion_rate: calculate_completion_rate(logs, window_days, today),
        total_completions: completed.clone().count(),
        last_completed_at: completed.map(|l| l.logged_at).max(),
    }
}

/// When in the day a habit usually gets done.
///
/// Returns `None` with fewer than [`MIN_PATTERN_SAMPLES`] completions.
pub fn analyze_completion_pattern(habit_id: &str, logs: &[HabitLog]) -> Option<CompletionPattern> {
    let minutes: Vec<u32> = logs
        .iter()
        .filter(|l| l.completed)
        .map(|l| time::minute_of_day(l.logged_at.time()))
        .collect();

    if minutes.len() < MIN_PATTERN_SAMPLES {
        return None;
    }

    // (minute, count) in first-seen order
    let mut frequency: Vec<(u32, usize)> = Vec::new();
    let mut slot: HashMap<u32, usize> = HashMap::new();
    for &m in &minutes {
        match slot.get(&m) {
            Some(&i) => frequency[i].1 += 1,
            None => {
                slot.insert(m, frequency.len());
                frequency.push((m, 1));
            }
        }
    }
    // stable: ties keep first-seen order
    frequency.sort_by(|a, b| b.1.cmp(&a.1));

    let n = minutes.len() as f64;
    let total: u64 = minutes.iter().map(|&m| u64::from(m)).sum();
    let average = (total as f64 / n).round();
    let variance = minutes
        .iter()
        .map(|&m| (f64::from(m) - average).powi(2))
        .sum::<f64>()
        / n;

    Some(CompletionPattern {
        habit_id: habit_id.to_string(),
        average_completion_time: time::time_from_minute_of_day(average as u32),
        common_completion_times: frequency
            .iter()
            .take(3)
            .map(|(m, _)| time::time_from_minute_of_day(*m))
            .collect(),
        completion_time_variance: variance.sqrt().round() as u32,
        sample_size: minutes.len(),
    })
}

/// Reminder slot for a habit: the learned average when the pattern is tight
/// enough, otherwise the configured default.
pub fn predict_optimal_reminder_time(
    pattern: Option<&CompletionPattern>,
    default_time: NaiveTime,
    max_variance_minutes: u32,
) -> NaiveTime {
    match pattern {
        Some(p) if p.completion_time_variance <= max_variance_minutes => p.average_completion_time,
        _ => default_time,
    }
}

pub fn is_today_completed(logs: &[HabitLog], today: NaiveDate) -> bool {
    logs.iter().any(|l| l.completed && l.date == today)
}

pub fn format_streak_text(streak: u32) -> String {
    match streak {
        0 => "Start your streak!".to_string(),
        1 => "1 day streak".to_string(),
        n => format!("{n} day streak"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn log(days_back: u64, hhmm: &str, completed: bool) -> HabitLog {
        let date = today().checked_sub_days(Days::new(days_back)).unwrap();
        let at = DateTime::parse_from_rfc3339(&format!("{date}T{hhmm}:00-05:00")).unwrap();
        HabitLog::completed_at(format!("l{days_back}-{hhmm}"), "h1", "u1", at).with_completed(completed)
    }

    fn t(s: &str) -> NaiveTime {
        time::parse_time_of_day(s).unwrap()
    }

    #[test]
    fn test_completion_rate_empty() {
        assert_eq!(calculate_completion_rate(&[], 30, today()), 0);
    }

    #[test]
    fn test_completion_rate_single_log_today() {
        assert_eq!(calculate_completion_rate(&[log(0, "08:00", true)], 30, today()), 100);
    }

    #[test]
    fn test_completion_rate_relative_to_logs_in_window() {
        let logs = vec![
            log(0, "08:00", true),
            log(1, "08:00", false),
            log(2, "08:00", true),
            log(3, "08:00", false),
            // outside the 30-day window
            log(45, "08:00", true),
        ];
        assert_eq!(calculate_completion_rate(&logs, 30, today()), 50);
    }

    #[test]
    fn test_completion_rate_rounds() {
        let logs = vec![log(0, "08:00", true), log(1, "08:00", true), log(2, "08:00", false)];
        assert_eq!(calculate_completion_rate(&logs, 30, today()), 67);
    }

    #[test]
    fn test_completion_window_is_exactly_n_days() {
        // one log per day for 31 days, today missed
        let logs: Vec<HabitLog> = (0..=30).map(|back| log(back, "08:00", back != 0)).collect();
        assert_eq!(calculate_completion_rate(&logs, 30, today()), 97);

        // a 1-day window sees only today
        let logs = vec![log(0, "08:00", false), log(1, "08:00", true)];
        assert_eq!(calculate_completion_rate(&logs, 1, today()), 0);
        let logs = vec![log(0, "08:00", true), log(1, "08:00", false)];
        assert_eq!(calculate_completion_rate(&logs, 1, today()), 100);
    }

    #[test]
    fn test_habit_stats_rollup() {
        let logs = vec![
            log(0, "07:00", true),
            log(1, "07:10", true),
            log(2, "07:20", false),
            log(3, "06:50", true),
        ];
        let stats = calculate_habit_stats("h1", &logs, DEFAULT_COMPLETION_WINDOW_DAYS, today());
        assert_eq!(stats.habit_id, "h1");
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_completions, 3);
        assert_eq!(stats.completion_rate, 75);
        assert_eq!(stats.last_completed_at, Some(logs[0].logged_at));
    }

    #[test]
    fn test_habit_stats_no_logs() {
        let stats = calculate_habit_stats("h9", &[], 30, today());
        assert_eq!(stats.total_completions, 0);
        assert_eq!(stats.last_completed_at, None);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn test_pattern_needs_three_completions() {
        let logs = vec![log(0, "07:00", true), log(1, "07:00", true), log(2, "07:00", false)];
        assert!(analyze_completion_pattern("h1", &logs).is_none());
    }

    #[test]
    fn test_pattern_average_and_spread() {
        let logs = vec![
            log(0, "07:00", true),
            log(1, "08:00", true),
            log(2, "09:00", true),
        ];
        let p = analyze_completion_pattern("h1", &logs).unwrap();
        assert_eq!(p.average_completion_time, t("08:00"));
        // sqrt(((60^2) * 2) / 3) = 48.99
        assert_eq!(p.completion_time_variance, 49);
        assert_eq!(p.sample_size, 3);
    }

    #[test]
    fn test_pattern_common_times_ties_keep_first_seen_order() {
        let logs = vec![
            log(0, "21:00", true),
            log(1, "07:30", true),
            log(2, "07:30", true),
            log(3, "18:15", true),
            log(4, "21:00", true),
            log(5, "12:00", true),
        ];
        let p = analyze_completion_pattern("h1", &logs).unwrap();
        assert_eq!(p.common_completion_times, vec![t("21:00"), t("07:30"), t("18:15")]);
    }

    #[test]
    fn test_pattern_serializes_hhmm() {
        let logs = vec![log(0, "06:05", true), log(1, "06:05", true), log(2, "06:05", true)];
        let p = analyze_completion_pattern("h1", &logs).unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["average_completion_time"], "06:05");
        assert_eq!(v["common_completion_times"][0], "06:05");
        assert_eq!(v["completion_time_variance"], 0);
    }

    #[test]
    fn test_predict_reminder_time() {
        let tight = CompletionPattern {
            habit_id: "h1".into(),
            average_completion_time: t("07:15"),
            common_completion_times: vec![t("07:15")],
            completion_time_variance: 20,
            sample_size: 5,
        };
        let loose = CompletionPattern { completion_time_variance: 121, ..tight.clone() };
        let default = t("09:00");

        assert_eq!(predict_optimal_reminder_time(Some(&tight), default, 120), t("07:15"));
        assert_eq!(predict_optimal_reminder_time(Some(&loose), default, 120), default);
        assert_eq!(predict_optimal_reminder_time(None, default, 120), default);
    }

    #[test]
    fn test_today_completed_and_streak_text() {
        let logs = vec![log(0, "07:00", false), log(1, "07:00", true)];
        assert!(!is_today_completed(&logs, today()));
        assert!(is_today_completed(&[log(0, "07:00", true)], today()));

        assert_eq!(format_streak_text(0), "Start your streak!");
        assert_eq!(format_streak_text(1), "1 day streak");
        assert_eq!(format_streak_text(12), "12 day streak");
    }
}
