use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use lumen_core::analytics::{DEFAULT_COMPLETION_WINDOW_DAYS, DEFAULT_MAX_REMINDER_VARIANCE_MINUTES};
use lumen_core::time::parse_time_of_day;

use crate::state::ensure_lumen_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default)]
    pub stats: StatsSection,
    #[serde(default)]
    pub reminders: RemindersSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    pub user_id: String,
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSection {
    pub completion_window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersSection {
    /// Above this spread (minutes) a completion pattern is not trusted.
    pub max_variance_minutes: u32,
    /// `HH:MM`, used when there is no usable pattern.
    pub default_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Snapshot file; relative paths are resolved against the lumen home.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    /// Treat the sync collaborator as unreachable.
    pub offline: bool,
    /// JSONL hand-off file for flushed writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_file: Option<PathBuf>,
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            user_id: "me".to_string(),
            timezone: default_timezone(),
        }
    }
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            completion_window_days: DEFAULT_COMPLETION_WINDOW_DAYS,
        }
    }
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            max_variance_minutes: DEFAULT_MAX_REMINDER_VARIANCE_MINUTES,
            default_time: "09:00".to_string(),
        }
    }
}

impl Config {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.stats.completion_window_days == 0 {
            bail!("[stats].completion_window_days must be at least 1");
        }
        self.reminders.default_time()?;
        Ok(())
    }
}

impl RemindersSection {
    pub fn default_time(&self) -> Result<NaiveTime> {
        parse_time_of_day(&self.default_time)
            .with_context(|| format!("[reminders].default_time = {:?}", self.default_time))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_lumen_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate().with_context(|| format!("invalid {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [profile]
            user_id = "u1"

            [sync]
            offline = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.profile.timezone, "America/Chicago");
        assert_eq!(cfg.stats.completion_window_days, 30);
        assert_eq!(cfg.reminders.max_variance_minutes, 120);
        assert!(cfg.sync.offline);
        assert!(cfg.store.data_file.is_none());
    }

    #[test]
    fn test_default_time_parses() {
        let r = RemindersSection::default();
        assert_eq!(r.default_time().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());

        let bad = RemindersSection {
            default_time: "9am".into(),
            ..RemindersSection::default()
        };
        assert!(bad.default_time().is_err());
    }

    #[test]
    fn test_zero_completion_window_rejected() {
        let cfg: Config = toml::from_str("[stats]\ncompletion_window_days = 0\n").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("completion_window_days"));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.profile.user_id, "me");
        assert_eq!(back.reminders.default_time, "09:00");
    }
}
