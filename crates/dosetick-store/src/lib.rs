//! `dosetick-store` — SQLite persistence for the medication list and dose
//! log.
//!
//! This is the host side of the reminder contract: the store owns the
//! durable facts (which medications exist, which doses were taken), and the
//! engine owns nothing durable. `due_today` produces the list the host
//! feeds the engine — scheduled for today's weekday, minus doses already
//! taken today.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::MedicationStore;
