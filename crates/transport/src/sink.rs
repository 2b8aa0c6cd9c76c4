//! Transport sink abstraction

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Which transport carries the frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Raw byte stream, newline-delimited frames
    #[default]
    Serial,
    /// One frame per notification to a subscribed peer
    Notification,
}

/// Destination for complete frames.
///
/// `send` reports the outcome of a single attempt. Callers never retry: a
/// failed frame is dropped and the next tick sends fresh data.
pub trait TransportSink: Send {
    /// Transport family
    fn kind(&self) -> TransportKind;

    /// Whether the underlying device or radio is usable
    fn is_ready(&self) -> bool;

    /// Called once before the first frame
    fn start(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send {
        async { Ok(()) }
    }

    /// Deliver one complete frame
    fn send(&mut self, frame: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;
}
