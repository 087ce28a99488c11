//! Terminal sink — renders notifications as the host's toast surface.

use std::io::Write;

use async_trait::async_trait;

use dosetick_core::{Notification, NotificationKind};

use crate::{error::NotifyError, notifier::Notifier};

/// Writes each notification to stdout, with the take-now hint the prompt
/// loop understands.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

fn kind_tag(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Due => "due",
        NotificationKind::Missed => "missed",
        NotificationKind::Taken => "taken",
    }
}

/// Render a notification to its terminal form.
///
/// The action line echoes the exact `take <id>` command the host prompt
/// accepts, so the toast is actionable by copy-typing.
pub fn render(notification: &Notification) -> String {
    let mut out = format!(
        "[{}] {}: {}",
        kind_tag(notification.kind),
        notification.title,
        notification.body
    );
    if let (Some(id), Some(action)) = (&notification.medication_id, &notification.action) {
        out.push_str(&format!("\n    {}: take {}", action.label, id));
    }
    out
}

#[async_trait]
impl Notifier for TerminalNotifier {
    fn name(&self) -> &str {
        "terminal"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", render(notification))?;
        stdout.flush()?;
        Ok(())
    }
}
