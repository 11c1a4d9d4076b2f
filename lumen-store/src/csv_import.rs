//! Import habit logs from a CSV export.
//!
//! Expected header (column order is free, extra columns are ignored):
//! id,habit_id,user_id,logged_at,date,completed,notes
//!
//! `date` and `notes` may be empty. An empty `date` falls back to the day of
//! `logged_at` in its own offset.

use chrono::DateTime;
use csv::StringRecord;
use std::path::Path;
use tracing::debug;

use lumen_core::{calendar_day, HabitLog};

use crate::error::{Result, StoreError};

const REQUIRED: [&str; 5] = ["id", "habit_id", "user_id", "logged_at", "completed"];

struct Columns {
    id: usize,
    habit_id: usize,
    user_id: usize,
    logged_at: usize,
    completed: usize,
    date: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let need = |name: &str| {
            find(name).ok_or_else(|| StoreError::MalformedRow {
                line: 1,
                message: format!("missing column `{name}`"),
            })
        };

        Ok(Self {
            id: need(REQUIRED[0])?,
            habit_id: need(REQUIRED[1])?,
            user_id: need(REQUIRED[2])?,
            logged_at: need(REQUIRED[3])?,
            completed: need(REQUIRED[4])?,
            date: find("date"),
            notes: find("notes"),
        })
    }
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse a habit-log CSV file. Blank rows are skipped; any other row that
/// does not parse fails the whole import with its line number.
pub fn import_habit_logs_csv(path: impl AsRef<Path>) -> Result<Vec<HabitLog>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let cols = Columns::from_header(rdr.headers()?)?;
    let mut logs = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let malformed = |message: String| StoreError::MalformedRow { line, message };

        let id = field(&record, cols.id);
        let habit_id = field(&record, cols.habit_id);
        let user_id = field(&record, cols.user_id);
        if id.is_empty() || habit_id.is_empty() || user_id.is_empty() {
            return Err(malformed("id, habit_id and user_id are required".into()));
        }

        let raw_at = field(&record, cols.logged_at);
        let logged_at = DateTime::parse_from_rfc3339(raw_at)
            .map_err(|e| malformed(format!("logged_at `{raw_at}`: {e}")))?;

        let raw_completed = field(&record, cols.completed);
        let completed = parse_bool(raw_completed)
            .ok_or_else(|| malformed(format!("completed `{raw_completed}` is not a boolean")))?;

        let date = match cols.date.map(|i| field(&record, i)).filter(|s| !s.is_empty()) {
            Some(raw) => calendar_day(raw).map_err(|e| malformed(e.to_string()))?,
            None => logged_at.date_naive(),
        };

        let notes = cols
            .notes
            .map(|i| field(&record, i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        logs.push(HabitLog {
            id: id.to_string(),
            habit_id: habit_id.to_string(),
            user_id: user_id.to_string(),
            logged_at,
            date,
            completed,
            notes,
        });
    }

    debug!(path = %path.display(), rows = logs.len(), "imported habit logs");
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_parse_rows() {
        let f = write_csv(
            "id,habit_id,user_id,logged_at,date,completed,notes\n\
             l1,h1,u1,2026-10-18T07:45:00-05:00,2026-10-18,true,\n\
             ,,,,,,\n\
             l2,h1,u1,2026-10-19T23:30:00-05:00,,yes,late one\n",
        );
        let logs = import_habit_logs_csv(f.path()).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert!(logs[0].notes.is_none());
        // falls back to the day in the recorded offset, not UTC
        assert_eq!(logs[1].date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(logs[1].notes.as_deref(), Some("late one"));
    }

    #[test]
    fn test_columns_in_any_order() {
        let f = write_csv(
            "completed,logged_at,user_id,habit_id,id\n\
             0,2026-10-19T08:00:00Z,u1,h2,l9\n",
        );
        let logs = import_habit_logs_csv(f.path()).unwrap();
        assert_eq!(logs[0].id, "l9");
        assert!(!logs[0].completed);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let f = write_csv(
            "id,habit_id,user_id,logged_at,date,completed,notes\n\
             l1,h1,u1,2026-10-18T07:45:00-05:00,,true,\n\
             l2,h1,u1,yesterday,,true,\n",
        );
        match import_habit_logs_csv(f.path()) {
            Err(StoreError::MalformedRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let f = write_csv("id,habit_id,logged_at,completed\n");
        assert!(matches!(
            import_habit_logs_csv(f.path()),
            Err(StoreError::MalformedRow { line: 1, .. })
        ));
    }
}
