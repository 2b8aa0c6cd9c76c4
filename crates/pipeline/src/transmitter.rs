//! Transmit tick: snapshot, frame, deliver

use crate::stats::PipelineStats;
use frame_codec::{FrameError, Framer, FramerConfig, TelemetryRecord};
use ring_buffer::SampleReader;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use transport::{ConnectionState, TransportError, TransportSink};

/// What a single transmit tick did
#[derive(Debug)]
pub enum TickOutcome {
    /// Frame handed to the transport
    Sent { bytes: usize },
    /// No peer attached; nothing was built
    NoPeer,
    /// Record did not fit the transmit buffer; nothing was sent
    Overflow(FrameError),
    /// Transport rejected the frame; it is dropped
    SendFailed(TransportError),
}

impl TickOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, TickOutcome::Sent { .. })
    }
}

/// Sole reader of the channel rings; owns the transmit buffer
pub struct Transmitter<S: TransportSink> {
    reader: SampleReader,
    framer: Framer,
    sink: S,
    connection: Arc<ConnectionState>,
    stats: Arc<PipelineStats>,
    /// Latest value per channel, reused every tick
    scratch: Vec<i16>,
    send_timeout: Duration,
}

impl<S: TransportSink> Transmitter<S> {
    pub fn new(
        reader: SampleReader,
        framer_config: &FramerConfig,
        sink: S,
        connection: Arc<ConnectionState>,
        send_timeout: Duration,
    ) -> Self {
        let channels = reader.channels();
        Self {
            reader,
            framer: Framer::new(framer_config),
            sink,
            connection,
            stats: Arc::new(PipelineStats::new()),
            scratch: vec![0; channels],
            send_timeout,
        }
    }

    /// Report into shared counters instead of private ones
    pub fn with_stats(mut self, stats: Arc<PipelineStats>) -> Self {
        self.stats = stats;
        self
    }

    /// One transmit tick stamped with `timestamp_ms`.
    ///
    /// Builds a record only if a peer is attached. Every failure is final for
    /// this tick: nothing is queued or retried.
    pub async fn tick(&mut self, timestamp_ms: u64) -> TickOutcome {
        if !self.connection.is_attached() {
            trace!("No peer attached, skipping tick at {} ms", timestamp_ms);
            self.stats.record_idle();
            return TickOutcome::NoPeer;
        }

        self.reader.latest_into(&mut self.scratch);
        let record = TelemetryRecord::new(timestamp_ms, &self.scratch);

        let frame = match self.framer.encode(&record) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping frame at {} ms: {}", timestamp_ms, e);
                self.stats.record_overflow();
                return TickOutcome::Overflow(e);
            }
        };
        let bytes = frame.len();

        let result = match tokio::time::timeout(self.send_timeout, self.sink.send(frame)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.send_timeout.as_millis() as u64)),
        };

        match result {
            Ok(()) => {
                debug!("Sent {} byte frame at {} ms", bytes, timestamp_ms);
                self.stats.record_sent(bytes);
                TickOutcome::Sent { bytes }
            }
            Err(e) => {
                warn!("Frame at {} ms dropped: {}", timestamp_ms, e);
                self.stats.record_send_failure();
                TickOutcome::SendFailed(e)
            }
        }
    }

    pub fn stats(&self) -> &Arc<PipelineStats> {
        &self.stats
    }

    pub fn connection(&self) -> &Arc<ConnectionState> {
        &self.connection
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
