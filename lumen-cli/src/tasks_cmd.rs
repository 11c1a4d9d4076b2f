use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use lumen_core::{HorizonBuckets, HorizonStatus, LogStore, Task, TaskHorizon};

use crate::session::{next_id, Session};

#[derive(Debug, Serialize)]
struct TaskLine {
    id: String,
    title: String,
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct HorizonReport {
    horizon: TaskHorizon,
    #[serde(flatten)]
    status: HorizonStatus,
    tasks: Vec<TaskLine>,
}

fn open_buckets(session: &Session) -> Result<HorizonBuckets> {
    let tasks = session.store.list_tasks(session.user_id(), session.today)?;
    Ok(HorizonBuckets::from_tasks(&tasks, session.today))
}

pub fn horizon(session: &Session) -> Result<()> {
    let buckets = open_buckets(session)?;

    let report: Vec<HorizonReport> = TaskHorizon::ALL
        .iter()
        .map(|&h| HorizonReport {
            horizon: h,
            status: buckets.status(h),
            tasks: buckets
                .bucket(h)
                .iter()
                .map(|t| TaskLine {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    due_date: t.due_date,
                })
                .collect(),
        })
        .collect();

    session.emit(&report, || {
        for r in &report {
            let flag = if r.status.blocked {
                " (blocked: clear 2-day tasks first)"
            } else if r.status.warning {
                " (due soon)"
            } else {
                ""
            };
            println!("## {} [{}]{}", r.horizon, r.status.count, flag);
            for t in &r.tasks {
                match t.due_date {
                    Some(d) => println!("- {} (due {})", t.title, d),
                    None => println!("- {}", t.title),
                }
            }
        }
    })
}

pub fn add_task(
    session: &mut Session,
    title: String,
    due: Option<NaiveDate>,
    goal: Option<String>,
    force: bool,
) -> Result<()> {
    let id = next_id("task", session.store.snapshot().tasks.iter().map(|t| t.id.as_str()));
    let mut task = Task::new(&id, session.user_id(), title, Utc::now().fixed_offset());
    if let Some(due) = due {
        task = task.with_due_date(due, session.today);
    }
    if let Some(goal) = goal {
        task = task.with_goal(goal);
    }

    let buckets = open_buckets(session)?;
    if !force && !buckets.can_add_to_horizon(task.horizon) {
        bail!(
            "{} is blocked while {} 2-day task(s) are open (pass --force to add anyway)",
            task.horizon,
            buckets.count(TaskHorizon::TwoDay)
        );
    }

    let horizon = task.horizon;
    let today = session.today;
    session.store.put_task(task, today);
    session.save()?;

    println!("Added task {id} [{horizon}]");
    Ok(())
}
