use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a medication (UUID v4 string).
///
/// Stable across engine runs for the same logical medication — the reminder
/// state keys every set and map on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MedicationId(pub String);

impl MedicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for MedicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for MedicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MedicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The scheduled time string could not be parsed as `HH:MM`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid time of day: {input} (expected HH:MM, 00:00–23:59)")]
pub struct ParseTimeError {
    pub input: String,
}

/// A local time of day at minute precision.
///
/// Accepts `H:MM` or `HH:MM` 24-hour form on parse; always formats
/// zero-padded (`08:00`). Serialises through the string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour <= 23 && minute <= 59 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Minutes since local midnight — used for same-day ordering.
    pub fn minute_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseTimeError {
            input: s.to_string(),
        };

        let (h, m) = s.split_once(':').ok_or_else(err)?;
        // Minutes are always two digits; hours may drop the leading zero.
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(err());
        }
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;
        TimeOfDay::new(hour, minute).ok_or_else(err)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Day-of-week tag for medications that are not taken every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
            DayOfWeek::Sat => "sat",
            DayOfWeek::Sun => "sun",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mon" => Ok(DayOfWeek::Mon),
            "tue" => Ok(DayOfWeek::Tue),
            "wed" => Ok(DayOfWeek::Wed),
            "thu" => Ok(DayOfWeek::Thu),
            "fri" => Ok(DayOfWeek::Fri),
            "sat" => Ok(DayOfWeek::Sat),
            "sun" => Ok(DayOfWeek::Sun),
            other => Err(format!("unknown day of week: {other}")),
        }
    }
}

/// A medication schedule record — owned by the host, read-only to the
/// reminder engine.
///
/// `time` stays a raw string at this boundary: the store validates it at
/// data entry, and the engine parses it defensively so a malformed value
/// skips the medication rather than crashing the poll loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    /// Display label, no semantic constraint.
    pub name: String,
    /// Scheduled local time of day in `HH:MM` 24-hour form.
    pub time: String,
    /// Weekday restriction. `None` means every day; if present, the store
    /// guarantees the list is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayOfWeek>>,
}

impl Medication {
    /// Whether this medication is due at all on the given weekday.
    pub fn is_scheduled_on(&self, day: Weekday) -> bool {
        match &self.days {
            None => true,
            Some(days) => days.contains(&DayOfWeek::from_weekday(day)),
        }
    }
}
