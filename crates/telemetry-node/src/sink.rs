//! Transport selected at startup

use transport::{NotifySink, SerialSink, TransportError, TransportKind, TransportSink};
use tokio_serial::SerialStream;

/// The one sink the node runs with, picked from configuration
pub enum NodeSink {
    /// Physical serial port
    Port(SerialSink<SerialStream>),
    /// Serial framing on the process stdout
    Stdout(SerialSink<tokio::io::Stdout>),
    /// Notification link
    Notify(NotifySink),
}

impl TransportSink for NodeSink {
    fn kind(&self) -> TransportKind {
        match self {
            NodeSink::Port(sink) => sink.kind(),
            NodeSink::Stdout(sink) => sink.kind(),
            NodeSink::Notify(sink) => sink.kind(),
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            NodeSink::Port(sink) => sink.is_ready(),
            NodeSink::Stdout(sink) => sink.is_ready(),
            NodeSink::Notify(sink) => sink.is_ready(),
        }
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        match self {
            NodeSink::Port(sink) => sink.start().await,
            NodeSink::Stdout(sink) => sink.start().await,
            NodeSink::Notify(sink) => sink.start().await,
        }
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        match self {
            NodeSink::Port(sink) => sink.send(frame).await,
            NodeSink::Stdout(sink) => sink.send(frame).await,
            NodeSink::Notify(sink) => sink.send(frame).await,
        }
    }
}
