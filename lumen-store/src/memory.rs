//! In-memory `LogStore`.
//!
//! Holds a [`Snapshot`] and enforces the write rules:
//! - daily logs upsert on `(user, date, goal)`, keeping the existing id and
//!   `created_at`
//! - habit logs upsert on `(habit, date)`
//! - task horizons are re-derived on write and on read
//! - every upsert is also queued in the outbox

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{debug, info};

use lumen_core::{
    AcceptanceCriterion, DailyLog, DayType, Goal, Habit, HabitLog, LogStore, Task, UpsertDailyLog,
};

use crate::error::{Result, StoreError};
use crate::outbox::{Outbox, PendingPayload};
use crate::snapshot::Snapshot;

/// Source of "now" for `created_at` and outbox timestamps.
pub type Clock = fn() -> DateTime<FixedOffset>;

fn system_clock() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Snapshot,
    clock: Clock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Snapshot::default(),
            clock: system_clock,
        }
    }

    /// Wrap a loaded snapshot after checking its invariants.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            data: snapshot,
            clock: system_clock,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.data
    }

    pub fn outbox(&self) -> &Outbox {
        &self.data.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.data.outbox
    }

    pub fn add_habit(&mut self, habit: Habit) {
        self.data.habits.retain(|h| h.id != habit.id);
        self.data.habits.push(habit);
    }

    pub fn add_goal(&mut self, goal: Goal) {
        self.data.goals.retain(|g| g.id != goal.id);
        self.data.goals.push(goal);
    }

    pub fn add_criterion(&mut self, criterion: AcceptanceCriterion) {
        self.data.acceptance_criteria.retain(|c| c.id != criterion.id);
        self.data.acceptance_criteria.push(criterion);
    }

    /// Insert or replace a task, re-deriving its horizon against `today`.
    pub fn put_task(&mut self, mut task: Task, today: NaiveDate) {
        task.refresh_horizon(today);
        self.data.tasks.retain(|t| t.id != task.id);
        self.data.tasks.push(task);
    }

    /// Insert a habit log, or overwrite the one already recorded for the same
    /// habit and day. Returns the stored row.
    pub fn upsert_habit_log(&mut self, log: HabitLog) -> HabitLog {
        let stored = match self
            .data
            .habit_logs
            .iter_mut()
            .find(|l| l.habit_id == log.habit_id && l.date == log.date)
        {
            Some(existing) => {
                debug!(habit_id = %log.habit_id, date = %log.date, "updating habit log");
                let id = existing.id.clone();
                *existing = HabitLog { id, ..log };
                existing.clone()
            }
            None => {
                self.data.habit_logs.push(log.clone());
                log
            }
        };

        let now = (self.clock)();
        self.data
            .outbox
            .enqueue(PendingPayload::HabitLog(stored.clone()), now);
        stored
    }

    /// Remove a habit log by id. Derived stats must be recomputed from what
    /// remains; nothing is cached here.
    pub fn delete_habit_log(&mut self, id: &str) -> Result<HabitLog> {
        let pos = self
            .data
            .habit_logs
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StoreError::HabitLogNotFound(id.to_string()))?;
        info!(id, "deleted habit log");
        Ok(self.data.habit_logs.remove(pos))
    }
}

/// Readable id for a new daily log, suffixed until it is unused. Readable
/// parts can coincide across keys (user `a-b` vs goal `b`), so the id is
/// checked against the rows already stored.
fn daily_log_id(params: &UpsertDailyLog, existing: &[DailyLog]) -> String {
    let base = match params.goal_id.as_deref() {
        Some(goal) => format!("dl-{}-{}-{}", params.user_id, params.date.format("%Y%m%d"), goal),
        None => format!("dl-{}-{}", params.user_id, params.date.format("%Y%m%d")),
    };
    let taken = |id: &str| existing.iter().any(|l| l.id == id);

    let mut id = base.clone();
    let mut n = 1;
    while taken(&id) {
        n += 1;
        id = format!("{base}-{n}");
    }
    id
}

impl LogStore for MemoryStore {
    type Error = StoreError;

    fn list_habit_logs(&self, habit_id: Option<&str>) -> Result<Vec<HabitLog>> {
        Ok(self
            .data
            .habit_logs
            .iter()
            .filter(|l| habit_id.is_none_or(|h| l.habit_id == h))
            .cloned()
            .collect())
    }

    fn list_daily_logs(&self, user_id: &str, goal_id: Option<&str>) -> Result<Vec<DailyLog>> {
        Ok(self
            .data
            .daily_logs
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter(|l| goal_id.is_none_or(|g| l.goal_id.as_deref() == Some(g)))
            .cloned()
            .collect())
    }

    fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
        goal_id: Option<&str>,
    ) -> Result<Option<DailyLog>> {
        Ok(self
            .data
            .daily_logs
            .iter()
            .find(|l| l.user_id == user_id && l.date == date && l.goal_id.as_deref() == goal_id)
            .cloned())
    }

    fn list_acceptance_criteria(
        &self,
        user_id: &str,
        day_type: DayType,
    ) -> Result<Vec<AcceptanceCriterion>> {
        let mut out: Vec<AcceptanceCriterion> = self
            .data
            .acceptance_criteria
            .iter()
            .filter(|c| c.user_id == user_id && c.day_type == day_type)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    fn upsert_daily_log(&mut self, params: UpsertDailyLog) -> Result<DailyLog> {
        let now = (self.clock)();

        let stored = match self.data.daily_logs.iter_mut().find(|l| params.matches(l)) {
            Some(existing) => {
                existing.criteria_met = params.criteria_met;
                existing.day_won = params.day_won;
                existing.win_condition_met = params.win_condition_met;
                existing.reflection = params.reflection;
                existing.planned_next_day = params.planned_next_day;
                info!(id = %existing.id, date = %existing.date, "updated daily log");
                existing.clone()
            }
            None => {
                let log = DailyLog {
                    id: daily_log_id(&params, &self.data.daily_logs),
                    user_id: params.user_id,
                    date: params.date,
                    goal_id: params.goal_id,
                    criteria_met: params.criteria_met,
                    day_won: params.day_won,
                    win_condition_met: params.win_condition_met,
                    reflection: params.reflection,
                    planned_next_day: params.planned_next_day,
                    created_at: now,
                };
                info!(id = %log.id, date = %log.date, "created daily log");
                self.data.daily_logs.push(log.clone());
                log
            }
        };

        self.data
            .outbox
            .enqueue(PendingPayload::DailyLog(stored.clone()), now);
        Ok(stored)
    }

    fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        Ok(self
            .data
            .habits
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_tasks(&self, user_id: &str, today: NaiveDate) -> Result<Vec<Task>> {
        Ok(self
            .data
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .map(|mut t| {
                t.refresh_horizon(today);
                t
            })
            .collect())
    }

    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self.data.goals.iter().find(|g| g.id == goal_id).cloned())
    }
}
