//! Error types for `lumen-store`.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("duplicate daily log for user {user_id} on {date} (goal {goal_id:?})")]
    DuplicateDailyLog {
        user_id: String,
        date: NaiveDate,
        goal_id: Option<String>,
    },

    #[error("habit log not found: {0}")]
    HabitLogNotFound(String),
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
