//! Structured-log sink — the always-available default.

use async_trait::async_trait;
use tracing::info;

use dosetick_core::Notification;

use crate::{error::NotifyError, notifier::Notifier};

/// Emits every notification as a structured `tracing` event, so reminder
/// traffic shows up in whatever subscriber the host installed.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            kind = ?notification.kind,
            title = %notification.title,
            body = %notification.body,
            duration_ms = notification.duration_ms,
            "notification"
        );
        Ok(())
    }
}
