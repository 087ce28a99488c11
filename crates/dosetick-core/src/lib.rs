//! `dosetick-core` — shared types for the dosetick workspace.
//!
//! Holds everything more than one crate needs: the medication schedule
//! record, notification payloads passed from the reminder engine to the
//! delivery sinks, the figment-based configuration layer, and the top-level
//! error type.

pub mod config;
pub mod error;
pub mod notification;
pub mod types;

pub use config::{DosetickConfig, ReminderConfig};
pub use error::{DosetickError, Result};
pub use notification::{Notification, NotificationAction, NotificationKind};
pub use types::{DayOfWeek, Medication, MedicationId, ParseTimeError, TimeOfDay};
