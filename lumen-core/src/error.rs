//! Error types for `lumen-core`.
//!
//! The derivation functions themselves never fail. These errors only come out
//! of the parsing helpers that sit at the edge where strings become typed
//! records.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid calendar day or timestamp: {0:?}")]
    InvalidDate(String),

    #[error("invalid time of day (expected HH:MM): {0:?}")]
    InvalidTime(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("unknown task horizon: {0:?}")]
    UnknownHorizon(String),

    #[error("unknown day type: {0:?}")]
    UnknownDayType(String),

    #[error("unknown habit frequency: {0:?}")]
    UnknownFrequency(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
