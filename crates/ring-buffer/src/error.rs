//! Ring Bank Error Types

use thiserror::Error;

/// Errors when sizing a channel bank
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// At least one channel is required
    #[error("Channel bank needs at least one channel")]
    NoChannels,

    /// Rings must hold at least one sample
    #[error("Ring capacity must be at least one sample")]
    ZeroCapacity,
}
