//! Frame Error Types

use thiserror::Error;

/// Errors while encoding or verifying a telemetry frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Encoded frame does not fit the transmit buffer
    #[error("Frame needs {needed} bytes but transmit buffer holds {capacity}")]
    Overflow { needed: usize, capacity: usize },

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected:04X}, got {actual:04X}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// Invalid frame layout
    #[error("Invalid frame format: {0}")]
    InvalidFormat(String),
}
