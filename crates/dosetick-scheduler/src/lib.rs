//! `dosetick-scheduler` — the dose-reminder engine.
//!
//! # Overview
//!
//! The [`engine::ReminderEngine`] observes a local wall-clock against each
//! medication's scheduled time-of-day and emits [`Notification`]s as its only
//! output. Each poll tick classifies every unacknowledged medication:
//!
//! | Class      | Behaviour                                                  |
//! |------------|------------------------------------------------------------|
//! | upcoming   | nothing yet                                                |
//! | due now    | one due notification per medication per local day          |
//! | overdue    | missed notification, repeated at the re-notify interval    |
//!
//! Acknowledging a dose suppresses further notifications for that id until
//! the medication list changes, forwards the medication to the host for
//! persistence, and emits a confirmation.
//!
//! All bookkeeping lives in a [`state::ReminderState`] owned by the engine
//! and rebuilt whenever the list is replaced or the local day rolls over —
//! the engine holds no memory of prior days.
//!
//! [`Notification`]: dosetick_core::Notification

pub mod classify;
pub mod clock;
pub mod engine;
pub mod error;
pub mod state;

pub use classify::DoseClass;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineCommand, ReminderEngine, ReminderHandle};
pub use error::{Result, SchedulerError};
pub use state::{DoseStatus, ReminderState, StateEvent};
