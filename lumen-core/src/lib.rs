//! lumen-core: the derivation engine behind Lumen's accountability tracker.
//!
//! Pure functions from already-fetched logs to progress signals: habit
//! streaks, completion analytics, task horizons, day-won verdicts and win
//! statistics. Every function takes the reference day explicitly, so the same
//! input always produces the same output.

pub mod acceptance;
pub mod analytics;
pub mod error;
pub mod habit;
pub mod horizon;
pub mod stats;
pub mod store;
pub mod streak;
pub mod task;
pub mod time;
pub mod win;

pub use acceptance::{evaluate_day_completion, AcceptanceCriterion, DayCompletionStatus, DayType};
pub use analytics::{
    analyze_completion_pattern, calculate_completion_rate, calculate_habit_stats,
    format_streak_text, is_today_completed, predict_optimal_reminder_time, CompletionPattern,
    HabitStats, DEFAULT_COMPLETION_WINDOW_DAYS, DEFAULT_MAX_REMINDER_VARIANCE_MINUTES,
};
pub use error::{Error, Result};
pub use habit::{Habit, HabitFrequency, HabitLog};
pub use horizon::{calculate_horizon, is_valid_horizon_transition, HorizonBuckets, HorizonStatus};
pub use stats::{calculate_win_stats, calculate_win_streak, DayOutcome, StreakData, WinStats};
pub use store::{LogStore, UpsertDailyLog};
pub use streak::{calculate_streak, streak_from_days, HabitStreak};
pub use task::{Task, TaskHorizon};
pub use time::{calendar_day, days_difference, format_iso_day, today_in, DayNumber};
pub use win::{calculate_win_status, DailyLog, Goal, GoalStatus, WinStatus};
