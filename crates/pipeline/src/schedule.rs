//! Periodic schedules

use crate::clock::Uptime;
use crate::stats::PipelineStats;
use crate::transmitter::Transmitter;
use signal_generator::{SampleGenerator, SampleSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;
use transport::TransportSink;

/// High-rate schedule: one generator tick per period until shutdown.
///
/// Late ticks are caught up in a burst so every period yields one sample.
pub async fn run_sampler<S: SampleSource>(
    mut generator: SampleGenerator<S>,
    period: Duration,
    stats: Arc<PipelineStats>,
    mut shutdown: watch::Receiver<bool>,
) -> SampleGenerator<S> {
    info!("Sampler running every {:?}", period);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = ticker.tick() => {
                generator.tick();
                stats.record_sample_tick();
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Sampler stopped after {} ticks", generator.ticks());
    generator
}

/// Low-rate schedule: one transmit tick per period until shutdown.
///
/// Missed ticks are skipped; a late tick sends the freshest data rather than
/// replaying the backlog.
pub async fn run_transmitter<S: TransportSink>(
    mut transmitter: Transmitter<S>,
    period: Duration,
    uptime: Uptime,
    mut shutdown: watch::Receiver<bool>,
) -> Transmitter<S> {
    info!("Transmitter running every {:?}", period);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = ticker.tick() => {
                transmitter.tick(uptime.millis()).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Transmitter stopped");
    transmitter
}
