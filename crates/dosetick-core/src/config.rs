use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How often the engine samples the clock, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
/// Minimum gap between repeated missed notifications for the same dose.
pub const DEFAULT_RENOTIFY_INTERVAL_SECS: u64 = 600;
/// On engine start, doses due within this many minutes surface immediately.
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 10;

/// Top-level config (dosetick.toml + DOSETICK_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DosetickConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Reminder timing policy.
///
/// The poll interval must not exceed the re-notify interval, otherwise a
/// missed dose would be re-announced on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_renotify_interval")]
    pub renotify_interval_secs: u64,
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            renotify_interval_secs: DEFAULT_RENOTIFY_INTERVAL_SECS,
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
        }
    }
}

impl ReminderConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(crate::error::DosetickError::Config(
                "reminder.poll_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.poll_interval_secs > self.renotify_interval_secs {
            return Err(crate::error::DosetickError::Config(format!(
                "reminder.poll_interval_secs ({}) must not exceed renotify_interval_secs ({})",
                self.poll_interval_secs, self.renotify_interval_secs
            )));
        }
        if self.lookback_minutes < 0 {
            return Err(crate::error::DosetickError::Config(
                "reminder.lookback_minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_renotify_interval() -> u64 {
    DEFAULT_RENOTIFY_INTERVAL_SECS
}
fn default_lookback_minutes() -> i64 {
    DEFAULT_LOOKBACK_MINUTES
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.dosetick/dosetick.db")
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.dosetick/dosetick.toml")
}

impl DosetickConfig {
    /// Load config from a TOML file with DOSETICK_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.dosetick/dosetick.toml
    ///
    /// A missing file is fine — defaults apply; a present-but-invalid file
    /// (or an invalid override) is an error.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: DosetickConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("DOSETICK_").split("_"))
            .extract()
            .map_err(|e| crate::error::DosetickError::Config(e.to_string()))?;

        config.reminder.validate()?;
        Ok(config)
    }

    /// Load like [`load`](Self::load), falling back to defaults with a
    /// warning instead of failing. Used by the host binary at startup.
    pub fn load_or_default(config_path: Option<&str>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("config load failed ({e}), using defaults");
            Self::default()
        })
    }
}
