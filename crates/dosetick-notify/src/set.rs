use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{info, warn};

use dosetick_core::Notification;

use crate::notifier::Notifier;

/// Manages a collection of notification sinks.
///
/// Sinks are stored by their [`Notifier::name`]. Delivery fans out to every
/// sink sequentially; a sink failure is logged and does not abort delivery
/// to the remaining sinks.
pub struct NotifierSet {
    sinks: HashMap<String, Box<dyn Notifier>>,
}

impl NotifierSet {
    /// Create an empty set with no registered sinks.
    pub fn new() -> Self {
        Self {
            sinks: HashMap::new(),
        }
    }

    /// Register a sink.
    ///
    /// If a sink with the same name is already registered it is replaced.
    pub fn register(&mut self, sink: Box<dyn Notifier>) {
        let name = sink.name().to_string();
        info!(sink = %name, "registering notification sink");
        self.sinks.insert(name, sink);
    }

    /// Names of all registered sinks, sorted for deterministic output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sinks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Deliver one notification to every registered sink.
    pub async fn deliver_all(&self, notification: &Notification) {
        for (name, sink) in &self.sinks {
            if let Err(e) = sink.deliver(notification).await {
                warn!(sink = %name, error = %e, "notification delivery failed");
            }
        }
    }

    /// Delivery-router loop: drain the engine's notification channel until
    /// every sender is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        info!(sinks = ?self.names(), "notification delivery router started");
        while let Some(notification) = rx.recv().await {
            self.deliver_all(&notification).await;
        }
        info!("notification channel closed, delivery router stopping");
    }
}

impl Default for NotifierSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use async_trait::async_trait;
    use dosetick_core::{Medication, MedicationId};
    use std::sync::{Arc, Mutex};

    struct Recording {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Notifier for Recording {
        fn name(&self) -> &str {
            self.name
        }
        async fn deliver(&self, n: &Notification) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(n.title.clone());
            Ok(())
        }
    }

    struct AlwaysFail;

    #[async_trait]
    impl Notifier for AlwaysFail {
        fn name(&self) -> &str {
            "broken"
        }
        async fn deliver(&self, _n: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::DeliveryFailed("intentional failure".to_string()))
        }
    }

    fn notification() -> Notification {
        Notification::due(&Medication {
            id: MedicationId::from("m1"),
            name: "Aspirin".to_string(),
            time: "08:00".to_string(),
            days: None,
        })
    }

    #[tokio::test]
    async fn a_failing_sink_does_not_block_the_others() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut set = NotifierSet::new();
        set.register(Box::new(AlwaysFail));
        set.register(Box::new(Recording {
            name: "recorder",
            seen: Arc::clone(&seen),
        }));

        set.deliver_all(&notification()).await;

        assert_eq!(seen.lock().unwrap().as_slice(), ["Medicine Reminder"]);
    }

    #[tokio::test]
    async fn registering_the_same_name_replaces_the_sink() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut set = NotifierSet::new();
        set.register(Box::new(Recording {
            name: "recorder",
            seen: Arc::clone(&first),
        }));
        set.register(Box::new(Recording {
            name: "recorder",
            seen: Arc::clone(&second),
        }));

        set.deliver_all(&notification()).await;

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_drains_the_channel_until_senders_drop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut set = NotifierSet::new();
        set.register(Box::new(Recording {
            name: "recorder",
            seen: Arc::clone(&seen),
        }));

        let (tx, rx) = mpsc::channel(8);
        let router = tokio::spawn(set.run(rx));

        tx.send(notification()).await.unwrap();
        tx.send(notification()).await.unwrap();
        drop(tx);

        router.await.unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
