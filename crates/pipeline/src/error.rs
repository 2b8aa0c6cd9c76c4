//! Pipeline Error Types

use ring_buffer::RingError;
use thiserror::Error;
use transport::TransportError;

/// Errors that stop the pipeline from starting or running
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Ring allocation rejected
    #[error("Channel bank error: {0}")]
    Ring(#[from] RingError),

    /// Transport device or radio not ready at startup
    #[error("Device not ready: {0}")]
    DeviceNotReady(String),

    /// Transport failed to start
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A schedule task panicked or was cancelled
    #[error("Schedule task failed: {0}")]
    TaskFailed(String),
}
