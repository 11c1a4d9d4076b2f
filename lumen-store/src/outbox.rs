//! Outbox of writes waiting to reach the sync collaborator.
//!
//! Every upsert lands here as well as in the store. Pending writes are keyed
//! like the rows they carry, so a second write to the same key replaces the
//! first (last writer wins) instead of queueing both.
//!
//! Flushing:
//! - offline: nothing happens
//! - delivered: removed
//! - failed: `retry_count` goes up; at `max_retries` the write is dropped

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::{debug, warn};

use lumen_core::{DailyLog, HabitLog};

use crate::connectivity::Connectivity;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PendingPayload {
    DailyLog(DailyLog),
    HabitLog(HabitLog),
}

/// Identity of the row a pending write carries: `(user, date, goal)` for
/// daily logs, `(habit, date)` for habit logs. Compared field by field, so
/// no id value can alias another row's key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingKey {
    DailyLog {
        user_id: String,
        date: NaiveDate,
        goal_id: Option<String>,
    },
    HabitLog {
        habit_id: String,
        date: NaiveDate,
    },
}

impl fmt::Display for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyLog { user_id, date, goal_id } => {
                write!(f, "daily_log user={user_id:?} date={date} goal={goal_id:?}")
            }
            Self::HabitLog { habit_id, date } => write!(f, "habit_log habit={habit_id:?} date={date}"),
        }
    }
}

impl PendingPayload {
    pub fn key(&self) -> PendingKey {
        match self {
            Self::DailyLog(l) => PendingKey::DailyLog {
                user_id: l.user_id.clone(),
                date: l.date,
                goal_id: l.goal_id.clone(),
            },
            Self::HabitLog(l) => PendingKey::HabitLog {
                habit_id: l.habit_id.clone(),
                date: l.date,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub seq: u64,
    pub key: PendingKey,
    pub payload: PendingPayload,
    pub queued_at: DateTime<FixedOffset>,
    pub retry_count: u32,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub delivered: usize,
    pub failed: usize,
    pub dropped: usize,
    /// Nothing was attempted because the context said offline.
    pub skipped_offline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outbox {
    #[serde(default)]
    next_seq: u64,
    #[serde(default)]
    items: Vec<PendingWrite>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pending writes in the order they were first queued.
    pub fn pending(&self) -> &[PendingWrite] {
        &self.items
    }

    /// Queue a write, replacing any pending write with the same key.
    pub fn enqueue(&mut self, payload: PendingPayload, queued_at: DateTime<FixedOffset>) {
        let key = payload.key();

        if let Some(existing) = self.items.iter_mut().find(|w| w.key == key) {
            debug!(%key, "replacing pending write");
            existing.payload = payload;
            existing.queued_at = queued_at;
            existing.retry_count = 0;
            return;
        }

        self.next_seq += 1;
        self.items.push(PendingWrite {
            seq: self.next_seq,
            key,
            payload,
            queued_at,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
        });
    }

    /// Hand pending writes to `deliver` while `ctx` says online.
    pub fn flush<F, E>(&mut self, ctx: &Connectivity, mut deliver: F) -> FlushReport
    where
        F: FnMut(&PendingWrite) -> Result<(), E>,
        E: Display,
    {
        let mut report = FlushReport::default();

        if !ctx.is_online() {
            debug!(pending = self.items.len(), "offline; outbox not flushed");
            report.skipped_offline = true;
            return report;
        }

        let mut kept = Vec::with_capacity(self.items.len());
        for mut write in std::mem::take(&mut self.items) {
            match deliver(&write) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    write.retry_count += 1;
                    if write.retry_count >= write.max_retries {
                        warn!(key = %write.key, retries = write.retry_count, error = %e, "dropping pending write");
                        report.dropped += 1;
                    } else {
                        warn!(key = %write.key, retries = write.retry_count, error = %e, "pending write failed");
                        report.failed += 1;
                        kept.push(write);
                    }
                }
            }
        }
        self.items = kept;

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-19T21:00:00-05:00").unwrap()
    }

    fn daily(date: &str, won: bool) -> PendingPayload {
        PendingPayload::DailyLog(DailyLog {
            id: format!("d-{date}"),
            user_id: "u1".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            goal_id: None,
            criteria_met: vec![],
            day_won: won,
            win_condition_met: None,
            reflection: None,
            planned_next_day: false,
            created_at: at(),
        })
    }

    fn online() -> Connectivity {
        Connectivity::online(Utc.with_ymd_and_hms(2026, 10, 20, 2, 0, 0).unwrap())
    }

    #[test]
    fn test_same_key_replaces() {
        let mut outbox = Outbox::new();
        outbox.enqueue(daily("2026-10-19", false), at());
        outbox.enqueue(daily("2026-10-19", true), at());
        outbox.enqueue(daily("2026-10-18", true), at());
        assert_eq!(outbox.len(), 2);
        match &outbox.pending()[0].payload {
            PendingPayload::DailyLog(l) => assert!(l.day_won),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_offline_flush_is_noop() {
        let mut outbox = Outbox::new();
        outbox.enqueue(daily("2026-10-19", true), at());
        let ctx = Connectivity::offline(Utc.with_ymd_and_hms(2026, 10, 20, 2, 0, 0).unwrap());
        let report = outbox.flush(&ctx, |_| Ok::<(), String>(()));
        assert!(report.skipped_offline);
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn test_online_flush_delivers_in_order() {
        let mut outbox = Outbox::new();
        outbox.enqueue(daily("2026-10-18", true), at());
        outbox.enqueue(daily("2026-10-19", true), at());

        let mut seen = Vec::new();
        let report = outbox.flush(&online(), |w| {
            seen.push(w.seq);
            Ok::<(), String>(())
        });
        assert_eq!(report.delivered, 2);
        assert_eq!(seen, vec![1, 2]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_failures_retry_then_drop() {
        let mut outbox = Outbox::new();
        outbox.enqueue(daily("2026-10-19", true), at());

        for attempt in 1..DEFAULT_MAX_RETRIES {
            let report = outbox.flush(&online(), |_| Err("sync endpoint unavailable"));
            assert_eq!(report.failed, 1);
            assert_eq!(outbox.pending()[0].retry_count, attempt);
        }

        let report = outbox.flush(&online(), |_| Err("sync endpoint unavailable"));
        assert_eq!(report.dropped, 1);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_keys_do_not_alias_across_goals() {
        let with_goal = |goal: &str| match daily("2026-10-19", true) {
            PendingPayload::DailyLog(mut l) => {
                l.goal_id = Some(goal.to_string());
                PendingPayload::DailyLog(l)
            }
            other => other,
        };

        let mut outbox = Outbox::new();
        outbox.enqueue(daily("2026-10-19", true), at());
        outbox.enqueue(with_goal("-"), at());
        outbox.enqueue(with_goal("none"), at());
        assert_eq!(outbox.len(), 3);

        let a = PendingKey::DailyLog {
            user_id: "u:1".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            goal_id: Some("g".into()),
        };
        let b = PendingKey::DailyLog {
            user_id: "u".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            goal_id: Some("1:g".into()),
        };
        assert_ne!(a, b);
    }
}
