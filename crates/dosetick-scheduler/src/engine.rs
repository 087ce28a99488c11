use std::sync::Arc;

use chrono::{Datelike, Duration};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use dosetick_core::{Medication, MedicationId, Notification, ReminderConfig, TimeOfDay};

use crate::{
    classify::{classify, DoseClass},
    clock::Clock,
    error::{Result, SchedulerError},
    state::{ReminderState, StateEvent},
};

/// Depth of the handle → engine command queue.
const COMMAND_QUEUE_DEPTH: usize = 64;

/// Commands routed from hosts to the engine's run loop.
#[derive(Debug)]
pub enum EngineCommand {
    /// Replace the observed medication list; resets all bookkeeping and
    /// triggers an immediate check.
    SetMedications(Vec<Medication>),
    /// The user accepted a notification's take-now action.
    Acknowledge(MedicationId),
}

/// Cloneable handle for driving the engine while its run loop owns the state.
#[derive(Debug, Clone)]
pub struct ReminderHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl ReminderHandle {
    /// Create a handle and the receiving end to pass to [`ReminderEngine::run`].
    pub fn channel() -> (Self, mpsc::Receiver<EngineCommand>) {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        (Self { tx }, rx)
    }

    pub async fn set_medications(&self, meds: Vec<Medication>) -> Result<()> {
        self.tx
            .send(EngineCommand::SetMedications(meds))
            .await
            .map_err(|_| SchedulerError::EngineStopped)
    }

    pub async fn acknowledge(&self, id: MedicationId) -> Result<()> {
        self.tx
            .send(EngineCommand::Acknowledge(id))
            .await
            .map_err(|_| SchedulerError::EngineStopped)
    }
}

/// A medication with its schedule time parsed once at list install.
///
/// `time` is `None` for malformed entries — they stay in the list (so an
/// acknowledge for them still resolves a name) but are skipped for timing.
#[derive(Debug, Clone)]
struct Tracked {
    med: Medication,
    time: Option<TimeOfDay>,
}

/// The dose-reminder engine.
///
/// Single-writer owner of the [`ReminderState`]: every mutation happens on
/// the task driving [`run`](Self::run), so ticks and command handling never
/// interleave. Notifications leave through an `mpsc` sender with `try_send`
/// — a slow or absent consumer never stalls the poll loop.
pub struct ReminderEngine {
    config: ReminderConfig,
    clock: Arc<dyn Clock>,
    notify_tx: mpsc::Sender<Notification>,
    /// If set, acknowledged medications are forwarded here for persistence.
    /// Fire-and-forget: the engine does not await or retry delivery.
    taken_tx: Option<mpsc::Sender<Medication>>,
    meds: Vec<Tracked>,
    state: ReminderState,
}

impl ReminderEngine {
    pub fn new(
        config: ReminderConfig,
        clock: Arc<dyn Clock>,
        notify_tx: mpsc::Sender<Notification>,
        taken_tx: Option<mpsc::Sender<Medication>>,
    ) -> Self {
        let day = clock.now().date();
        Self {
            config,
            clock,
            notify_tx,
            taken_tx,
            meds: Vec::new(),
            state: ReminderState::new(day),
        }
    }

    /// Install a new medication list, discarding all reminder bookkeeping.
    ///
    /// Schedule times are parsed here, once; malformed entries are logged
    /// and excluded from timing rather than crashing the loop. Duplicates
    /// by id are not meaningful — callers guarantee uniqueness.
    pub fn set_medications(&mut self, meds: Vec<Medication>) {
        let mut tracked = Vec::with_capacity(meds.len());
        for med in meds {
            let time = match med.time.parse::<TimeOfDay>() {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(
                        medication_id = %med.id,
                        name = %med.name,
                        "unparseable schedule time, medication will not be timed: {e}"
                    );
                    None
                }
            };
            tracked.push(Tracked { med, time });
        }

        self.meds = tracked;
        self.state = ReminderState::new(self.clock.now().date());
        info!(count = self.meds.len(), "medication list installed, reminder state reset");
    }

    /// Handle the take-now action for `id`.
    ///
    /// Suppresses all further due/missed notifications for the id until the
    /// list changes, forwards the medication on the taken channel, and emits
    /// the confirmation notification. Unknown or already-acknowledged ids
    /// are ignored.
    pub fn acknowledge(&mut self, id: &MedicationId) {
        if self.state.is_acknowledged(id) {
            debug!(medication_id = %id, "dose already acknowledged");
            return;
        }
        let Some(tracked) = self.meds.iter().find(|t| &t.med.id == id) else {
            debug!(medication_id = %id, "acknowledge for unknown medication, ignored");
            return;
        };
        let med = tracked.med.clone();

        self.state.apply(StateEvent::Acknowledged(id.clone()));
        info!(medication_id = %id, name = %med.name, "dose acknowledged");

        if let Some(ref tx) = self.taken_tx {
            // try_send never blocks; a persistence miss is reconciled by the
            // host's next list refresh.
            if tx.try_send(med.clone()).is_err() {
                warn!(medication_id = %id, "taken channel full or closed, taken event dropped");
            }
        }
        try_notify(&self.notify_tx, Notification::taken(&med));
    }

    /// Run one reminder check against the current clock reading.
    ///
    /// Synchronous and infallible: per-medication problems are skipped, and
    /// notification emission never blocks.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        // Local-midnight rollover: yesterday's bookkeeping must not leak
        // into today, or a 23:50 dose looked at 00:05 would stay "missed"
        // forever.
        if now.date() != self.state.day() {
            debug!(day = %now.date(), "local day rolled over, resetting reminder state");
            self.state = ReminderState::new(now.date());
        }

        let fresh = self.state.take_fresh();
        let weekday = now.weekday();
        let renotify = Duration::seconds(self.config.renotify_interval_secs as i64);

        for tracked in &self.meds {
            let med = &tracked.med;
            if self.state.is_acknowledged(&med.id) {
                continue;
            }
            if !med.is_scheduled_on(weekday) {
                continue;
            }
            let Some(time) = tracked.time else {
                continue;
            };

            match classify(time, now) {
                DoseClass::Upcoming => {}

                DoseClass::DueNow => {
                    if !self.state.due_already_notified(&med.id) {
                        debug!(medication_id = %med.id, time = %time, "dose due");
                        try_notify(&self.notify_tx, Notification::due(med));
                        self.state.apply(StateEvent::DueNotified(med.id.clone()));
                    }
                }

                DoseClass::Overdue { minutes } => {
                    // First tick over a fresh list: doses due within the
                    // look-back window surface as "due" instead of waiting
                    // for the missed cadence. Anything older is missed.
                    if fresh
                        && minutes <= self.config.lookback_minutes
                        && !self.state.due_already_notified(&med.id)
                    {
                        debug!(medication_id = %med.id, minutes, "recently due dose caught up");
                        try_notify(&self.notify_tx, Notification::due_catch_up(med));
                        self.state.apply(StateEvent::DueNotified(med.id.clone()));
                        continue;
                    }

                    if !self.state.is_missed(&med.id) {
                        self.state.apply(StateEvent::MissedFlagged(med.id.clone()));
                    }
                    if self.state.renotify_due(&med.id, now, renotify) {
                        debug!(medication_id = %med.id, minutes, "dose missed");
                        try_notify(&self.notify_tx, Notification::missed(med));
                        self.state
                            .apply(StateEvent::MissedNotified(med.id.clone(), now));
                    }
                }
            }
        }
    }

    /// Main event loop. Polls at the configured interval until `shutdown`
    /// broadcasts `true` or every handle is dropped.
    ///
    /// The interval (and any pending scheduled work) is dropped when this
    /// returns — no timer outlives the engine.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<EngineCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            poll_secs = self.config.poll_interval_secs,
            renotify_secs = self.config.renotify_interval_secs,
            "reminder engine started"
        );

        // The first interval tick completes immediately — that is the
        // check-once-on-start the reminder policy requires.
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(
            self.config.poll_interval_secs,
        ));

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick(),

                cmd = commands.recv() => match cmd {
                    Some(EngineCommand::SetMedications(meds)) => {
                        self.set_medications(meds);
                        self.tick();
                    }
                    Some(EngineCommand::Acknowledge(id)) => self.acknowledge(&id),
                    None => {
                        info!("all reminder handles dropped, engine stopping");
                        break;
                    }
                },

                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("reminder engine shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Emit a notification without ever blocking the tick loop.
fn try_notify(tx: &mpsc::Sender<Notification>, notification: Notification) {
    if tx.try_send(notification).is_err() {
        warn!("notification channel full or closed, notification dropped");
    }
}
