//! Pipeline composition and lifecycle

use crate::clock::Uptime;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::schedule::{run_sampler, run_transmitter};
use crate::stats::{PipelineStats, StatsSnapshot};
use crate::transmitter::Transmitter;
use ring_buffer::{ChannelBank, SampleReader};
use signal_generator::{SampleGenerator, SampleSource};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use transport::{ConnectionState, TransportSink};

/// Create the shutdown signal shared by every schedule
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Generator, rings, framer and transport wired together.
///
/// The transport is chosen by the caller; the pipeline only sees the
/// [`TransportSink`] trait and the connection state that gates it.
pub struct Pipeline<Src: SampleSource, Sink: TransportSink> {
    config: PipelineConfig,
    generator: SampleGenerator<Src>,
    transmitter: Transmitter<Sink>,
    reader: SampleReader,
    stats: Arc<PipelineStats>,
}

impl<Src, Sink> Pipeline<Src, Sink>
where
    Src: SampleSource + 'static,
    Sink: TransportSink + 'static,
{
    /// Validate `config`, allocate the rings and wire both schedules
    pub fn new(
        config: PipelineConfig,
        source: Src,
        sink: Sink,
        connection: Arc<ConnectionState>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let channels = source.channels();
        let bank = ChannelBank::new(channels, config.ring_capacity)?;
        let (writer, reader) = bank.split();
        let stats = Arc::new(PipelineStats::new());

        let generator = SampleGenerator::new(source, writer);
        let transmitter = Transmitter::new(
            reader.clone(),
            &config.framer,
            sink,
            connection,
            config.schedule.send_timeout(),
        )
        .with_stats(Arc::clone(&stats));

        info!(
            "Pipeline: {} channels x {} samples, sample {} Hz, transmit {} Hz, tx buffer {} bytes",
            channels,
            config.ring_capacity,
            config.schedule.sample_rate_hz,
            config.schedule.transmit_rate_hz,
            config.framer.tx_buffer_capacity
        );

        Ok(Self {
            config,
            generator,
            transmitter,
            reader,
            stats,
        })
    }

    /// Shared counters
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Read handle on the rings, e.g. for diagnostics
    pub fn reader(&self) -> SampleReader {
        self.reader.clone()
    }

    /// Run both schedules and the status loop until `shutdown` flips to true.
    ///
    /// Fails before any tick if the transport is not ready or cannot start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<StatsSnapshot, PipelineError> {
        let Self {
            config,
            generator,
            mut transmitter,
            stats,
            ..
        } = self;

        if !transmitter.sink().is_ready() {
            error!("{:?} transport not ready, not starting schedules", transmitter.sink().kind());
            return Err(PipelineError::DeviceNotReady(format!(
                "{:?} transport",
                transmitter.sink().kind()
            )));
        }
        transmitter.sink_mut().start().await?;

        let uptime = Uptime::start();
        let sampler = tokio::spawn(run_sampler(
            generator,
            config.schedule.sample_period(),
            Arc::clone(&stats),
            shutdown.clone(),
        ));
        let sender = tokio::spawn(run_transmitter(
            transmitter,
            config.schedule.transmit_period(),
            uptime,
            shutdown.clone(),
        ));

        let mut status = tokio::time::interval(config.schedule.status_interval());
        // First tick completes immediately
        status.tick().await;

        while !*shutdown.borrow() {
            tokio::select! {
                _ = status.tick() => log_status(&stats.snapshot(), uptime.millis()),
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        sampler
            .await
            .map_err(|e| PipelineError::TaskFailed(format!("sampler: {}", e)))?;
        sender
            .await
            .map_err(|e| PipelineError::TaskFailed(format!("transmitter: {}", e)))?;

        let snapshot = stats.snapshot();
        info!("Pipeline stopped");
        log_status(&snapshot, uptime.millis());
        Ok(snapshot)
    }
}

fn log_status(snap: &StatsSnapshot, uptime_ms: u64) {
    info!(
        uptime_ms,
        samples = snap.sample_ticks,
        sent = snap.frames_sent,
        failed = snap.send_failures,
        overflow = snap.overflow_skips,
        idle = snap.idle_ticks,
        "status"
    );
}
