//! Notification payloads — shared between the reminder engine and all
//! delivery sinks.

use serde::{Deserialize, Serialize};

use crate::types::{Medication, MedicationId};

/// Display duration hint for reminder notifications (due / missed).
pub const REMINDER_TOAST_MS: u64 = 10_000;
/// Display duration hint for the taken confirmation.
pub const CONFIRM_TOAST_MS: u64 = 3_000;
/// Action label offered on due and missed notifications.
pub const TAKE_NOW_LABEL: &str = "Take now";

/// What kind of reminder event a notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The scheduled minute has arrived (or just passed, on engine start).
    Due,
    /// The scheduled time is in the past and the dose is unacknowledged.
    Missed,
    /// The user acknowledged the dose.
    Taken,
}

/// An action the host may offer on the notification surface.
///
/// Invoking it is expected to route back into the engine as an acknowledge
/// command for the notification's `medication_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
}

/// A single notification event — the engine's only output.
///
/// The host binds this to whatever toast/alert mechanism it uses; sinks
/// must not block on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Subject medication. Absent only for notifications that are not about
    /// a specific dose (none today, but sinks must tolerate it).
    pub medication_id: Option<MedicationId>,
    pub title: String,
    pub body: String,
    /// How long the host should keep the notification visible, in ms.
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// The scheduled minute arrived exactly.
    pub fn due(med: &Medication) -> Self {
        Self {
            kind: NotificationKind::Due,
            medication_id: Some(med.id.clone()),
            title: "Medicine Reminder".to_string(),
            body: format!("Time to take {}", med.name),
            duration_ms: REMINDER_TOAST_MS,
            action: Some(NotificationAction {
                label: TAKE_NOW_LABEL.to_string(),
            }),
        }
    }

    /// Engine started shortly after the scheduled minute — surface the dose
    /// immediately instead of waiting for the missed cadence.
    pub fn due_catch_up(med: &Medication) -> Self {
        Self {
            kind: NotificationKind::Due,
            medication_id: Some(med.id.clone()),
            title: "Medicine Due".to_string(),
            body: format!("Please take {} now", med.name),
            duration_ms: REMINDER_TOAST_MS,
            action: Some(NotificationAction {
                label: TAKE_NOW_LABEL.to_string(),
            }),
        }
    }

    /// The dose is overdue and unacknowledged.
    pub fn missed(med: &Medication) -> Self {
        Self {
            kind: NotificationKind::Missed,
            medication_id: Some(med.id.clone()),
            title: "Missed Medicine Reminder".to_string(),
            body: format!("Please take {} as soon as possible", med.name),
            duration_ms: REMINDER_TOAST_MS,
            action: Some(NotificationAction {
                label: TAKE_NOW_LABEL.to_string(),
            }),
        }
    }

    /// Confirmation after the user acknowledged the dose.
    pub fn taken(med: &Medication) -> Self {
        Self {
            kind: NotificationKind::Taken,
            medication_id: Some(med.id.clone()),
            title: "Medicine Taken".to_string(),
            body: format!("You've taken {}", med.name),
            duration_ms: CONFIRM_TOAST_MS,
            action: None,
        }
    }
}
