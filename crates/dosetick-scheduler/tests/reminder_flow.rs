// End-to-end reminder timing: drive the engine tick-by-tick with a manual
// clock and assert on the emitted notification stream.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tokio::sync::{mpsc, watch};

use dosetick_core::{
    DayOfWeek, Medication, MedicationId, Notification, NotificationKind, ReminderConfig,
};
use dosetick_scheduler::{ManualClock, ReminderEngine, ReminderHandle, SchedulerError};

/// 2024-03-04 is a Monday — weekday-sensitive tests key off it.
fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn med(id: &str, name: &str, time: &str) -> Medication {
    Medication {
        id: MedicationId::from(id),
        name: name.to_string(),
        time: time.to_string(),
        days: None,
    }
}

struct Harness {
    clock: Arc<ManualClock>,
    engine: ReminderEngine,
    notify_rx: mpsc::Receiver<Notification>,
    taken_rx: mpsc::Receiver<Medication>,
}

impl Harness {
    fn new(start: NaiveDateTime) -> Self {
        let clock = Arc::new(ManualClock::new(start));
        let (notify_tx, notify_rx) = mpsc::channel(64);
        let (taken_tx, taken_rx) = mpsc::channel(64);
        let engine = ReminderEngine::new(
            ReminderConfig::default(),
            clock.clone(),
            notify_tx,
            Some(taken_tx),
        );
        Self {
            clock,
            engine,
            notify_rx,
            taken_rx,
        }
    }

    fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notify_rx.try_recv() {
            out.push(n);
        }
        out
    }

    fn tick_at(&mut self, at: NaiveDateTime) -> Vec<Notification> {
        self.clock.set(at);
        self.engine.tick();
        self.drain()
    }
}

fn kinds(notifications: &[Notification]) -> Vec<NotificationKind> {
    notifications.iter().map(|n| n.kind).collect()
}

#[test]
fn due_notification_fires_exactly_once_at_the_scheduled_minute() {
    let mut h = Harness::new(monday(7, 59));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);

    assert!(h.tick_at(monday(7, 59)).is_empty());

    let at_eight = h.tick_at(monday(8, 0));
    assert_eq!(kinds(&at_eight), vec![NotificationKind::Due]);
    assert_eq!(at_eight[0].body, "Time to take Aspirin");

    // One minute later the dose is overdue — only missed traffic from here,
    // never a second due notification.
    let later = h.tick_at(monday(8, 1));
    assert!(later.iter().all(|n| n.kind == NotificationKind::Missed));
}

#[test]
fn repeated_ticks_within_the_same_minute_do_not_duplicate_due() {
    let mut h = Harness::new(monday(8, 0));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);

    let first = h.tick_at(monday(8, 0));
    let second = h.tick_at(monday(8, 0));

    assert_eq!(kinds(&first), vec![NotificationKind::Due]);
    assert!(second.is_empty());
}

#[test]
fn overdue_dose_is_missed_once_then_renotified_on_the_cadence() {
    let mut h = Harness::new(monday(9, 0));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);

    // An hour past: far outside the look-back window, straight to missed.
    let first = h.tick_at(monday(9, 0));
    assert_eq!(kinds(&first), vec![NotificationKind::Missed]);
    assert_eq!(first[0].body, "Please take Aspirin as soon as possible");

    // Polls inside the re-notify interval stay quiet.
    assert!(h.tick_at(monday(9, 1)).is_empty());
    assert!(h.tick_at(monday(9, 5)).is_empty());

    // Interval elapsed — one repeat, then quiet again.
    assert_eq!(kinds(&h.tick_at(monday(9, 10))), vec![NotificationKind::Missed]);
    assert!(h.tick_at(monday(9, 11)).is_empty());
}

#[test]
fn acknowledge_suppresses_further_notifications_and_forwards_the_taken_fact() {
    let mut h = Harness::new(monday(9, 0));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);
    h.tick_at(monday(9, 0));

    h.engine.acknowledge(&MedicationId::from("m1"));

    let taken = h.taken_rx.try_recv().expect("taken event forwarded");
    assert_eq!(taken.id.as_str(), "m1");

    let confirmation = h.drain();
    assert_eq!(kinds(&confirmation), vec![NotificationKind::Taken]);
    assert_eq!(confirmation[0].body, "You've taken Aspirin");

    // Well past the re-notify interval: still nothing for an acknowledged dose.
    assert!(h.tick_at(monday(9, 30)).is_empty());
    assert!(h.tick_at(monday(10, 0)).is_empty());

    // Acknowledging twice is a no-op.
    h.engine.acknowledge(&MedicationId::from("m1"));
    assert!(h.taken_rx.try_recv().is_err());
    assert!(h.drain().is_empty());
}

#[test]
fn acknowledge_for_an_unknown_id_is_ignored() {
    let mut h = Harness::new(monday(8, 0));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);

    h.engine.acknowledge(&MedicationId::from("nope"));

    assert!(h.taken_rx.try_recv().is_err());
    assert!(h.drain().is_empty());
}

#[test]
fn replacing_the_list_resets_bookkeeping_even_for_the_same_ids() {
    let mut h = Harness::new(monday(8, 0));
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);

    assert_eq!(kinds(&h.tick_at(monday(8, 0))), vec![NotificationKind::Due]);
    h.engine.acknowledge(&MedicationId::from("m1"));
    h.drain();

    // Host pushes a refreshed list with the same id: the acknowledgment is
    // forgotten and the dose can notify again.
    h.engine.set_medications(vec![med("m1", "Aspirin", "08:00")]);
    let after_reset = h.tick_at(monday(8, 0));
    assert_eq!(kinds(&after_reset), vec![NotificationKind::Due]);
}

#[test]
fn late_evening_dose_does_not_become_missed_after_midnight() {
    let mut h = Harness::new(monday(23, 50));
    h.engine.set_medications(vec![med("m1", "Melatonin", "23:50")]);

    assert_eq!(kinds(&h.tick_at(monday(23, 50))), vec![NotificationKind::Due]);

    // 00:05 the next day: the day rolled over, so the dose is upcoming
    // again — no missed storm at day start.
    let next_day = monday(23, 50) + Duration::minutes(15);
    assert!(h.tick_at(next_day).is_empty());

    // And the fresh day notifies normally at the scheduled minute.
    let next_evening = monday(23, 50) + Duration::days(1);
    assert_eq!(kinds(&h.tick_at(next_evening)), vec![NotificationKind::Due]);
}

#[test]
fn two_medications_at_the_same_minute_notify_and_acknowledge_independently() {
    let mut h = Harness::new(monday(8, 0));
    h.engine.set_medications(vec![
        med("m1", "Aspirin", "08:00"),
        med("m2", "Ibuprofen", "08:00"),
    ]);

    let due = h.tick_at(monday(8, 0));
    assert_eq!(kinds(&due), vec![NotificationKind::Due, NotificationKind::Due]);
    let ids: Vec<&str> = due
        .iter()
        .map(|n| n.medication_id.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(ids, vec!["m1", "m2"]);

    h.engine.acknowledge(&MedicationId::from("m1"));
    h.drain();

    // Only the unacknowledged one goes missed.
    let missed = h.tick_at(monday(8, 1));
    assert_eq!(kinds(&missed), vec![NotificationKind::Missed]);
    assert_eq!(missed[0].medication_id.as_ref().unwrap().as_str(), "m2");
}

#[test]
fn starting_late_catches_up_recent_doses_but_not_old_ones() {
    let mut h = Harness::new(monday(8, 4));
    h.engine.set_medications(vec![
        med("m1", "Aspirin", "08:00"),  // 4 minutes ago — inside look-back
        med("m2", "Ibuprofen", "07:00"), // an hour ago — missed outright
    ]);

    let first = h.tick_at(monday(8, 4));
    assert_eq!(
        kinds(&first),
        vec![NotificationKind::Due, NotificationKind::Missed]
    );
    assert_eq!(first[0].title, "Medicine Due");
    assert_eq!(first[0].body, "Please take Aspirin now");
    assert_eq!(first[1].medication_id.as_ref().unwrap().as_str(), "m2");

    // The catch-up is once-only; from the next tick the recent dose follows
    // the normal missed cadence.
    let next = h.tick_at(monday(8, 5));
    assert_eq!(kinds(&next), vec![NotificationKind::Missed]);
    assert_eq!(next[0].medication_id.as_ref().unwrap().as_str(), "m1");
}

#[test]
fn weekday_restricted_medication_is_silent_on_other_days() {
    // 2024-03-05 is a Tuesday.
    let tuesday = monday(8, 0) + Duration::days(1);
    let mut h = Harness::new(tuesday);

    let mut restricted = med("m1", "Aspirin", "08:00");
    restricted.days = Some(vec![DayOfWeek::Mon]);
    h.engine.set_medications(vec![restricted]);

    assert!(h.tick_at(tuesday).is_empty());
    assert!(h.tick_at(tuesday + Duration::hours(1)).is_empty());
}

#[test]
fn malformed_schedule_time_is_skipped_without_crashing() {
    let mut h = Harness::new(monday(8, 0));
    h.engine.set_medications(vec![
        med("m1", "Broken", "25:99"),
        med("m2", "Aspirin", "08:00"),
    ]);

    let due = h.tick_at(monday(8, 0));
    assert_eq!(kinds(&due), vec![NotificationKind::Due]);
    assert_eq!(due[0].medication_id.as_ref().unwrap().as_str(), "m2");
}

#[tokio::test]
async fn run_loop_checks_immediately_when_the_list_changes() {
    let clock = Arc::new(ManualClock::new(monday(8, 0)));
    let (notify_tx, mut notify_rx) = mpsc::channel(64);
    let engine = ReminderEngine::new(ReminderConfig::default(), clock, notify_tx, None);

    let (handle, commands) = ReminderHandle::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(engine.run(commands, shutdown_rx));

    handle
        .set_medications(vec![med("m1", "Aspirin", "08:00")])
        .await
        .unwrap();

    let n = notify_rx.recv().await.expect("due notification");
    assert_eq!(n.kind, NotificationKind::Due);

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();

    // Once the engine is gone the handle reports it.
    let err = handle
        .set_medications(vec![med("m1", "Aspirin", "08:00")])
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::EngineStopped));
}

#[tokio::test]
async fn run_loop_routes_acknowledgments() {
    let clock = Arc::new(ManualClock::new(monday(9, 0)));
    let (notify_tx, mut notify_rx) = mpsc::channel(64);
    let (taken_tx, mut taken_rx) = mpsc::channel(64);
    let engine = ReminderEngine::new(
        ReminderConfig::default(),
        clock,
        notify_tx,
        Some(taken_tx),
    );

    let (handle, commands) = ReminderHandle::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(engine.run(commands, shutdown_rx));

    handle
        .set_medications(vec![med("m1", "Aspirin", "08:00")])
        .await
        .unwrap();
    let missed = notify_rx.recv().await.expect("missed notification");
    assert_eq!(missed.kind, NotificationKind::Missed);

    handle.acknowledge(MedicationId::from("m1")).await.unwrap();
    let taken = taken_rx.recv().await.expect("taken event");
    assert_eq!(taken.id.as_str(), "m1");
    let confirmation = notify_rx.recv().await.expect("confirmation");
    assert_eq!(confirmation.kind, NotificationKind::Taken);

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();
}
