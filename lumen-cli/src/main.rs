use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use lumen_core::time::{calendar_day, parse_time_of_day};
use lumen_core::{DayType, HabitFrequency};

mod config;
mod day_cmd;
mod habits_cmd;
mod session;
mod state;
mod sync_cmd;
mod tasks_cmd;

use session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "lumen",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LUMEN_BUILD_SHA"), ")"),
    about = "Lumen: habits, horizons and won days"
)]
struct Cli {
    /// Snapshot file (default: [store].data_file or ~/.lumen/lumen.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Evaluate as of this day instead of today in the profile timezone
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config to ~/.lumen/config.toml
    Init,

    /// Streaks and completion rate per habit
    HabitStats {
        #[arg(long)]
        habit: Option<String>,
    },

    /// Time-of-day completion pattern and suggested reminder for a habit
    Pattern {
        #[arg(long)]
        habit: String,
    },

    /// Open tasks grouped into 2-day / 7-day / future
    Horizon,

    /// Whether today is won
    WinStatus {
        #[arg(long)]
        goal: Option<String>,
    },

    /// Acceptance checklist progress for a day type
    DayStatus {
        /// standard, laundry-day or gym-day
        #[arg(long, default_value = "standard")]
        day_type: DayType,

        #[arg(long)]
        goal: Option<String>,
    },

    /// Win rate, streaks and the last 7/30 days
    WinStats {
        #[arg(long)]
        goal: Option<String>,
    },

    /// Record (or overwrite) today's daily log
    LogDay(day_cmd::LogDayArgs),

    /// Import habit logs from a CSV export
    ImportHabits {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Flush pending writes to the JSONL hand-off file
    Sync {
        /// Hand-off file (default: [sync].outbox_file or ~/.lumen/outbox.jsonl)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Treat the sync target as unreachable for this run
        #[arg(long, default_value_t = false)]
        offline: bool,
    },

    AddHabit {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "daily")]
        frequency: HabitFrequency,

        /// Reminder slot as HH:MM (repeatable)
        #[arg(long = "reminder", value_parser = parse_hhmm)]
        reminders: Vec<NaiveTime>,

        #[arg(long)]
        goal: Option<String>,
    },

    AddTask {
        #[arg(long)]
        title: String,

        #[arg(long, value_parser = parse_day)]
        due: Option<NaiveDate>,

        #[arg(long)]
        goal: Option<String>,

        /// Add even if the horizon is currently blocked
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    AddGoal {
        #[arg(long)]
        title: String,

        /// What makes a day "won" for this goal
        #[arg(long)]
        win_condition: Option<String>,
    },

    AddCriterion {
        #[arg(long, default_value = "standard")]
        day_type: DayType,

        #[arg(long)]
        text: String,

        /// Position in the checklist (default: last)
        #[arg(long)]
        order: Option<i32>,
    },
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    calendar_day(s).map_err(|e| e.to_string())
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, String> {
    parse_time_of_day(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Init = cli.command {
        return config::init_config();
    }

    let mut session = Session::open(cli.data, cli.today, cli.json)?;

    match cli.command {
        Command::Init => {}
        Command::HabitStats { habit } => habits_cmd::habit_stats(&session, habit)?,
        Command::Pattern { habit } => habits_cmd::pattern(&session, &habit)?,
        Command::Horizon => tasks_cmd::horizon(&session)?,
        Command::WinStatus { goal } => day_cmd::win_status(&session, goal)?,
        Command::DayStatus { day_type, goal } => day_cmd::day_status(&session, day_type, goal)?,
        Command::WinStats { goal } => day_cmd::win_stats(&session, goal)?,
        Command::LogDay(args) => day_cmd::log_day(&mut session, args)?,
        Command::ImportHabits { csv } => habits_cmd::import_habits(&mut session, &csv)?,
        Command::Sync { out, offline } => sync_cmd::sync(&mut session, out, offline)?,
        Command::AddHabit {
            name,
            frequency,
            reminders,
            goal,
        } => habits_cmd::add_habit(&mut session, name, frequency, reminders, goal)?,
        Command::AddTask {
            title,
            due,
            goal,
            force,
        } => tasks_cmd::add_task(&mut session, title, due, goal, force)?,
        Command::AddGoal {
            title,
            win_condition,
        } => day_cmd::add_goal(&mut session, title, win_condition)?,
        Command::AddCriterion {
            day_type,
            text,
            order,
        } => day_cmd::add_criterion(&mut session, day_type, text, order)?,
    }

    Ok(())
}
