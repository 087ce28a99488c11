use async_trait::async_trait;

use dosetick_core::Notification;

use crate::error::NotifyError;

/// Common interface implemented by every notification sink (terminal,
/// structured log, …).
///
/// Implementations must be `Send + Sync` so they can be stored in a
/// [`NotifierSet`](crate::set::NotifierSet) and driven from the delivery
/// task. Delivery takes `&self` — sinks are expected to be internally
/// synchronised and cheap; anything slow belongs behind its own queue.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable lowercase identifier for this sink (e.g. `"terminal"`).
    ///
    /// Used as the registry key inside a `NotifierSet` and must be unique
    /// across all registered sinks.
    fn name(&self) -> &str;

    /// Deliver a single notification.
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}
