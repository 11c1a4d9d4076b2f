use anyhow::{Context, Result};
use chrono::{NaiveTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use lumen_core::time::format_time_of_day;
use lumen_core::{
    analyze_completion_pattern, calculate_habit_stats, format_streak_text, is_today_completed,
    predict_optimal_reminder_time, CompletionPattern, Habit, HabitFrequency, HabitStats, LogStore,
};
use lumen_store::import_habit_logs_csv;

use crate::session::{next_id, Session};

#[derive(Debug, Serialize)]
struct HabitReport {
    name: String,
    done_today: bool,
    #[serde(flatten)]
    stats: HabitStats,
}

#[derive(Debug, Serialize)]
struct PatternReport {
    habit_id: String,
    pattern: Option<CompletionPattern>,
    suggested_reminder: String,
}

pub fn habit_stats(session: &Session, habit: Option<String>) -> Result<()> {
    let habits = session.store.list_habits(session.user_id())?;
    let targets: Vec<(String, String)> = match habit {
        Some(id) => {
            let name = habits
                .iter()
                .find(|h| h.id == id)
                .map(|h| h.name.clone())
                .unwrap_or_else(|| id.clone());
            vec![(id, name)]
        }
        None => habits.into_iter().map(|h| (h.id, h.name)).collect(),
    };

    let window = session.cfg.stats.completion_window_days;
    let mut rows = Vec::with_capacity(targets.len());
    for (id, name) in targets {
        let logs = session.store.list_habit_logs(Some(&id))?;
        rows.push(HabitReport {
            name,
            done_today: is_today_completed(&logs, session.today),
            stats: calculate_habit_stats(&id, &logs, window, session.today),
        });
    }

    session.emit(&rows, || {
        if rows.is_empty() {
            println!("No habits yet. Add one with: lumen add-habit --name <NAME>");
            return;
        }
        for r in &rows {
            println!(
                "[{}] {} | {} (best {}) | {}% of last {} days | total={}",
                if r.done_today { "x" } else { " " },
                r.name,
                format_streak_text(r.stats.current_streak),
                r.stats.longest_streak,
                r.stats.completion_rate,
                window,
                r.stats.total_completions,
            );
        }
    })
}

pub fn pattern(session: &Session, habit: &str) -> Result<()> {
    let logs = session.store.list_habit_logs(Some(habit))?;
    let pattern = analyze_completion_pattern(habit, &logs);

    let reminders = &session.cfg.reminders;
    let suggested = predict_optimal_reminder_time(
        pattern.as_ref(),
        reminders.default_time()?,
        reminders.max_variance_minutes,
    );

    let report = PatternReport {
        habit_id: habit.to_string(),
        pattern,
        suggested_reminder: format_time_of_day(suggested),
    };

    session.emit(&report, || {
        match &report.pattern {
            Some(p) => {
                let common: Vec<String> =
                    p.common_completion_times.iter().map(|t| format_time_of_day(*t)).collect();
                println!("Habit {} ({} completions)", p.habit_id, p.sample_size);
                println!("  average time : {}", format_time_of_day(p.average_completion_time));
                println!("  common times : {}", common.join(", "));
                println!("  variance     : {} min", p.completion_time_variance);
            }
            None => println!("Habit {}: not enough completions for a pattern yet", report.habit_id),
        }
        println!("Suggested reminder: {}", report.suggested_reminder);
    })
}

pub fn import_habits(session: &mut Session, csv: &Path) -> Result<()> {
    let logs =
        import_habit_logs_csv(csv).with_context(|| format!("importing {}", csv.display()))?;
    let count = logs.len();
    for log in logs {
        session.store.upsert_habit_log(log);
    }
    session.save()?;

    info!(count, path = %csv.display(), "imported habit logs");
    println!("Imported {} habit logs from {}", count, csv.display());
    Ok(())
}

pub fn add_habit(
    session: &mut Session,
    name: String,
    frequency: HabitFrequency,
    reminder_times: Vec<NaiveTime>,
    goal: Option<String>,
) -> Result<()> {
    let id = next_id("habit", session.store.snapshot().habits.iter().map(|h| h.id.as_str()));
    let habit = Habit {
        id: id.clone(),
        user_id: session.user_id().to_string(),
        goal_id: goal,
        name,
        frequency,
        reminder_times,
        icon: None,
        created_at: Utc::now().fixed_offset(),
    };
    session.store.add_habit(habit);
    session.save()?;

    println!("Added habit {id}");
    Ok(())
}
