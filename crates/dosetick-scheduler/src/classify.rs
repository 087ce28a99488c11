//! Minute-precision comparison of a scheduled time against the current
//! wall-clock, kept pure so the timing policy is testable in isolation.

use chrono::{NaiveDateTime, Timelike};
use dosetick_core::TimeOfDay;

/// Where a scheduled dose stands relative to `now`, same-day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseClass {
    /// Scheduled minute is still ahead today.
    Upcoming,
    /// The current minute label equals the scheduled time exactly.
    DueNow,
    /// The scheduled minute is strictly in the past today.
    Overdue {
        /// Whole minutes elapsed since the scheduled minute.
        minutes: i64,
    },
}

/// Classify `time` against `now`.
///
/// Comparison is by minute label — seconds within the current minute are
/// ignored, matching the `HH:MM` granularity of the schedule. Day-boundary
/// handling is the caller's job: this function only ever compares within
/// `now`'s own day.
pub fn classify(time: TimeOfDay, now: NaiveDateTime) -> DoseClass {
    let now_minute = now.hour() * 60 + now.minute();
    let scheduled = time.minute_of_day();

    if scheduled == now_minute {
        DoseClass::DueNow
    } else if scheduled < now_minute {
        DoseClass::Overdue {
            minutes: (now_minute - scheduled) as i64,
        }
    } else {
        DoseClass::Upcoming
    }
}
