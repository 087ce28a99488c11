//! Reminder bookkeeping — owned exclusively by the engine, rebuilt whenever
//! the medication list changes or the local day rolls over.
//!
//! All mutation goes through [`ReminderState::apply`] so every transition is
//! an explicit, testable event rather than ad-hoc set fiddling.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use dosetick_core::MedicationId;

/// A state transition recorded by the engine.
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// The due notification fired for this id today.
    DueNotified(MedicationId),
    /// The id was first judged overdue and unacknowledged.
    MissedFlagged(MedicationId),
    /// A missed notification fired at the given instant.
    MissedNotified(MedicationId, NaiveDateTime),
    /// The user acknowledged the dose.
    Acknowledged(MedicationId),
}

/// Where a single medication stands from the engine's perspective.
///
/// Exactly one of these holds per id at any instant — the sets inside
/// [`ReminderState`] are notification dedup bookkeeping, not parallel truths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseStatus {
    /// Not yet due, or never evaluated.
    Pending,
    /// Due notification fired, not (yet) overdue.
    Notified,
    /// Overdue and unacknowledged.
    Missed,
    /// Acknowledged — no further notifications until the list changes.
    Acknowledged,
}

/// Per-list, per-day reminder bookkeeping.
///
/// Created empty when the engine starts observing a medication list and
/// discarded wholesale on every list change or day rollover. Nothing here
/// is persisted.
#[derive(Debug)]
pub struct ReminderState {
    day: NaiveDate,
    fresh: bool,
    notified_due: HashSet<MedicationId>,
    missed: HashSet<MedicationId>,
    last_missed_at: HashMap<MedicationId, NaiveDateTime>,
    acknowledged: HashSet<MedicationId>,
}

impl ReminderState {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            fresh: true,
            notified_due: HashSet::new(),
            missed: HashSet::new(),
            last_missed_at: HashMap::new(),
            acknowledged: HashSet::new(),
        }
    }

    /// The local date this state belongs to.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// True exactly once: on the first tick after this state was built.
    /// Gates the bounded look-back scan.
    pub fn take_fresh(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }

    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::DueNotified(id) => {
                self.notified_due.insert(id);
            }
            StateEvent::MissedFlagged(id) => {
                self.missed.insert(id);
            }
            StateEvent::MissedNotified(id, at) => {
                self.missed.insert(id.clone());
                self.last_missed_at.insert(id, at);
            }
            StateEvent::Acknowledged(id) => {
                self.missed.remove(&id);
                self.last_missed_at.remove(&id);
                self.acknowledged.insert(id);
            }
        }
    }

    pub fn is_acknowledged(&self, id: &MedicationId) -> bool {
        self.acknowledged.contains(id)
    }

    pub fn due_already_notified(&self, id: &MedicationId) -> bool {
        self.notified_due.contains(id)
    }

    pub fn is_missed(&self, id: &MedicationId) -> bool {
        self.missed.contains(id)
    }

    /// Whether a missed notification may fire for `id` at `now`.
    ///
    /// True when none has fired yet, or the last one is at least
    /// `interval` old.
    pub fn renotify_due(&self, id: &MedicationId, now: NaiveDateTime, interval: Duration) -> bool {
        match self.last_missed_at.get(id) {
            None => true,
            Some(at) => now.signed_duration_since(*at) >= interval,
        }
    }

    pub fn status(&self, id: &MedicationId) -> DoseStatus {
        if self.acknowledged.contains(id) {
            DoseStatus::Acknowledged
        } else if self.missed.contains(id) {
            DoseStatus::Missed
        } else if self.notified_due.contains(id) {
            DoseStatus::Notified
        } else {
            DoseStatus::Pending
        }
    }
}
