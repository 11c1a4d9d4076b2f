//! Streak calculator.
//!
//! Walks completion days newest-first against an "expected day" pointer that
//! starts at today. Any gap closes the running streak. Only the first run,
//! and only when it starts today, counts as the live streak: a habit not done
//! today has no current streak, whatever its history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::HabitLog;
use crate::time::DayNumber;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Streak over completed habit logs. Duplicate logs for one day count once.
pub fn calculate_streak(logs: &[HabitLog], today: NaiveDate) -> HabitStreak {
    streak_from_days(
        logs.iter().filter(|l| l.completed).map(|l| l.date),
        today,
    )
}

/// Streak over an arbitrary set of "success" days.
///
/// Days after `today` are ignored.
pub fn streak_from_days<I>(days: I, today: NaiveDate) -> HabitStreak
where
    I: IntoIterator<Item = NaiveDate>,
{
    let today = DayNumber::from(today);

    let mut days: Vec<DayNumber> = days
        .into_iter()
        .map(DayNumber::from)
        .filter(|d| *d <= today)
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut expected = today;
    let mut run = 0u32;
    let mut current = 0u32;
    let mut longest = 0u32;
    let mut first_run = true;

    for day in days {
        if day == expected {
            run += 1;
            if first_run {
                current = run;
            }
        } else {
            longest = longest.max(run);
            run = 1;
            first_run = false;
        }
        expected = day.pred();
    }

    HabitStreak {
        current_streak: current,
        longest_streak: longest.max(run),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Days};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn log_on(days_back: u64) -> HabitLog {
        let date = today().checked_sub_days(Days::new(days_back)).unwrap();
        let at = DateTime::parse_from_rfc3339(&format!("{}T08:00:00-05:00", date)).unwrap();
        HabitLog::completed_at(format!("l{days_back}"), "h1", "u1", at)
    }

    #[test]
    fn test_empty_logs() {
        assert_eq!(calculate_streak(&[], today()), HabitStreak::default());
    }

    #[test]
    fn test_single_log_today() {
        let s = calculate_streak(&[log_on(0)], today());
        assert_eq!(s, HabitStreak { current_streak: 1, longest_streak: 1 });
    }

    #[test]
    fn test_unbroken_run_up_to_today() {
        let logs: Vec<_> = (0..5).map(log_on).collect();
        let s = calculate_streak(&logs, today());
        assert_eq!(s.current_streak, 5);
        assert_eq!(s.longest_streak, 5);
    }

    #[test]
    fn test_gap_breaks_chain() {
        let logs = vec![log_on(0), log_on(1), log_on(3)];
        let s = calculate_streak(&logs, today());
        assert_eq!(s, HabitStreak { current_streak: 2, longest_streak: 2 });
    }

    #[test]
    fn test_missed_today_zeroes_current() {
        // yesterday and the three days before it
        let logs: Vec<_> = (1..5).map(log_on).collect();
        let s = calculate_streak(&logs, today());
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 4);
    }

    #[test]
    fn test_longest_run_in_history() {
        let mut logs: Vec<_> = (10..17).map(log_on).collect();
        logs.extend([log_on(0), log_on(1)]);
        let s = calculate_streak(&logs, today());
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.longest_streak, 7);
    }

    #[test]
    fn test_duplicates_and_incomplete_logs() {
        let logs = vec![
            log_on(0),
            log_on(0),
            log_on(1).with_completed(false),
            log_on(2),
        ];
        let s = calculate_streak(&logs, today());
        assert_eq!(s, HabitStreak { current_streak: 1, longest_streak: 1 });
    }

    #[test]
    fn test_run_across_month_and_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let days = [
            NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
        ];
        let s = streak_from_days(days, today);
        assert_eq!(s.current_streak, 4);
        assert_eq!(s.longest_streak, 4);
    }

    #[test]
    fn test_future_days_ignored() {
        let tomorrow = today().succ_opt().unwrap();
        let s = streak_from_days([tomorrow, today()], today());
        assert_eq!(s, HabitStreak { current_streak: 1, longest_streak: 1 });
    }

    #[test]
    fn test_current_never_exceeds_longest() {
        let patterns: [&[u64]; 4] = [&[0, 1, 2, 5, 6], &[3, 4], &[0, 2, 4, 6], &[0, 1, 2, 3, 10, 11, 12, 13, 14]];
        for p in patterns {
            let logs: Vec<_> = p.iter().copied().map(log_on).collect();
            let s = calculate_streak(&logs, today());
            assert!(s.current_streak <= s.longest_streak, "{p:?} -> {s:?}");
        }
    }

    #[test]
    fn test_recompute_is_stable() {
        let logs = vec![log_on(0), log_on(1), log_on(4)];
        assert_eq!(calculate_streak(&logs, today()), calculate_streak(&logs, today()));
    }
}
