use thiserror::Error;

/// Errors that can occur within any notification sink.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The sink could not render or hand off the notification.
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    /// Underlying output stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
