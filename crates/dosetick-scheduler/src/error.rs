use thiserror::Error;

/// Errors that can occur within the reminder subsystem.
///
/// The engine itself never fails a tick — malformed inputs are skipped and
/// full sink channels are logged. The only failure surface is the handle,
/// once the engine task is gone.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The engine's command channel is closed — the run loop has exited.
    #[error("Reminder engine is no longer running")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
