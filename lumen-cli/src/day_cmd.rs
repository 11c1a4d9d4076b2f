use anyhow::{Context, Result};
use chrono::Utc;
use tracing::warn;

use lumen_core::{
    calculate_win_stats, calculate_win_status, evaluate_day_completion, AcceptanceCriterion,
    DayType, Goal, GoalStatus, LogStore, UpsertDailyLog,
};

use crate::session::{next_id, Session};

/// Flags of `lumen log-day`.
#[derive(clap::Args, Debug)]
pub struct LogDayArgs {
    /// Goal this log belongs to
    #[arg(long)]
    pub goal: Option<String>,

    /// Mark the day as won
    #[arg(long, default_value_t = false)]
    pub won: bool,

    /// Whether the goal's win condition was met (true/false)
    #[arg(long)]
    pub win_condition_met: Option<bool>,

    /// Acceptance criteria ids ticked off, comma separated
    #[arg(long, value_delimiter = ',')]
    pub criteria: Vec<String>,

    #[arg(long)]
    pub reflection: Option<String>,

    /// Tomorrow is already planned
    #[arg(long, default_value_t = false)]
    pub planned_next_day: bool,
}

fn find_goal(session: &Session, goal: Option<&str>) -> Result<Option<Goal>> {
    match goal {
        Some(id) => {
            let goal = session
                .store
                .get_goal(id)?
                .with_context(|| format!("no goal with id {id}"))?;
            Ok(Some(goal))
        }
        None => Ok(None),
    }
}

pub fn win_status(session: &Session, goal: Option<String>) -> Result<()> {
    let goal = find_goal(session, goal.as_deref())?;
    let log = session.store.get_daily_log(
        session.user_id(),
        session.today,
        goal.as_ref().map(|g| g.id.as_str()),
    )?;
    let status = calculate_win_status(log.as_ref(), goal.as_ref());

    session.emit(&status, || {
        let verdict = if status.won {
            "WON"
        } else if status.can_win {
            "open"
        } else {
            "not won"
        };
        println!("{}: {} ({})", session.today, verdict, status.reason);
    })
}

pub fn day_status(session: &Session, day_type: DayType, goal: Option<String>) -> Result<()> {
    let criteria = session
        .store
        .list_acceptance_criteria(session.user_id(), day_type)?;
    let log = session
        .store
        .get_daily_log(session.user_id(), session.today, goal.as_deref())?;
    let status = evaluate_day_completion(&criteria, day_type, log.as_ref());

    session.emit(&status, || {
        println!(
            "{} ({}): {}/{} criteria met",
            session.today, status.day_type, status.completed_criteria, status.total_criteria
        );
        for c in &status.missing_criteria {
            println!("  [ ] {} ({})", c.criteria_text, c.id);
        }
        if status.total_criteria == 0 {
            println!("No criteria for {day_type}; add some with: lumen add-criterion");
        } else if status.can_close_day {
            println!("Day can be closed.");
        }
    })
}

pub fn win_stats(session: &Session, goal: Option<String>) -> Result<()> {
    let logs = session
        .store
        .list_daily_logs(session.user_id(), goal.as_deref())?;
    let stats = calculate_win_stats(&logs, session.today);

    session.emit(&stats, || {
        let week: String = stats
            .last_7_days
            .iter()
            .map(|&won| if won { 'W' } else { '.' })
            .collect();
        println!(
            "Won {}/{} days ({:.1}%)",
            stats.won_days, stats.total_days, stats.win_rate
        );
        println!(
            "Streak: {} current, {} best",
            stats.current_streak, stats.best_streak
        );
        println!("Last week: {week}");
    })
}

pub fn log_day(session: &mut Session, args: LogDayArgs) -> Result<()> {
    if let Some(goal) = find_goal(session, args.goal.as_deref())? {
        if goal.has_win_condition() && args.won && args.win_condition_met != Some(true) {
            warn!(goal = %goal.id, "day marked won but the win condition is not marked met");
        }
    }

    let mut params = UpsertDailyLog::new(session.user_id(), session.today)
        .won(args.won, args.win_condition_met)
        .with_criteria_met(args.criteria);
    if let Some(goal) = args.goal {
        params = params.for_goal(goal);
    }
    params.reflection = args.reflection;
    params.planned_next_day = args.planned_next_day;

    let log = session.store.upsert_daily_log(params)?;
    session.save()?;

    println!(
        "Logged {} ({})",
        log.date,
        if log.day_won { "won" } else { "not won" }
    );
    Ok(())
}

pub fn add_goal(session: &mut Session, title: String, win_condition: Option<String>) -> Result<()> {
    let id = next_id("goal", session.store.snapshot().goals.iter().map(|g| g.id.as_str()));
    session.store.add_goal(Goal {
        id: id.clone(),
        user_id: session.user_id().to_string(),
        title,
        win_condition,
        status: GoalStatus::Active,
    });
    session.save()?;

    println!("Added goal {id}");
    Ok(())
}

pub fn add_criterion(
    session: &mut Session,
    day_type: DayType,
    text: String,
    order: Option<i32>,
) -> Result<()> {
    let existing = session
        .store
        .list_acceptance_criteria(session.user_id(), day_type)?;
    let order_index = match order {
        Some(o) => o,
        None => existing.iter().map(|c| c.order_index + 1).max().unwrap_or(0),
    };

    let id = next_id(
        "crit",
        session.store.snapshot().acceptance_criteria.iter().map(|c| c.id.as_str()),
    );
    session.store.add_criterion(AcceptanceCriterion {
        id: id.clone(),
        user_id: session.user_id().to_string(),
        criteria_text: text,
        day_type,
        order_index,
        created_at: Utc::now().fixed_offset(),
    });
    session.save()?;

    println!("Added {day_type} criterion {id}");
    Ok(())
}
