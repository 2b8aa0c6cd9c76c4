//! Transport Error Types

use crate::connection::PeerId;
use thiserror::Error;

/// Errors that can occur while delivering a frame
#[derive(Debug, Error)]
pub enum TransportError {
    /// Serial port or stream error
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// No peer has subscribed to notifications
    #[error("No peer subscribed to notifications")]
    NotSubscribed,

    /// Notification queue is full
    #[error("Notification buffers exhausted")]
    BufferExhausted,

    /// Frame larger than a single notification can carry
    #[error("Frame of {len} bytes exceeds notification limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// A peer is already attached
    #[error("Peer {0} already attached")]
    AlreadyAttached(PeerId),

    /// Send did not complete in time
    #[error("Send timed out after {0}ms")]
    Timeout(u64),

    /// Device or radio not ready
    #[error("Transport not ready: {0}")]
    NotReady(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::SerialError(err.to_string())
    }
}

impl From<tokio_serial::Error> for TransportError {
    fn from(err: tokio_serial::Error) -> Self {
        TransportError::SerialError(err.to_string())
    }
}
