//! `dosetick-notify` — notification delivery sinks.
//!
//! The reminder engine emits [`Notification`]s into an mpsc channel; a
//! [`NotifierSet`] drains that channel and fans each notification out to
//! every registered [`Notifier`] adapter (terminal toast, structured log,
//! …). A failing adapter is logged and skipped — it never blocks the rest.
//!
//! [`Notification`]: dosetick_core::Notification

pub mod error;
pub mod log;
pub mod notifier;
pub mod set;
pub mod terminal;

pub use error::NotifyError;
pub use log::TracingNotifier;
pub use notifier::Notifier;
pub use set::NotifierSet;
pub use terminal::TerminalNotifier;
