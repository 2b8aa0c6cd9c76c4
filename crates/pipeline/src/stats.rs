//! Pipeline counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the schedules and read by the status task.
///
/// Each increment is mirrored to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PipelineStats {
    sample_ticks: AtomicU64,
    transmit_ticks: AtomicU64,
    frames_sent: AtomicU64,
    bytes_sent: AtomicU64,
    send_failures: AtomicU64,
    overflow_skips: AtomicU64,
    idle_ticks: AtomicU64,
}

/// Point-in-time copy of [`PipelineStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub sample_ticks: u64,
    pub transmit_ticks: u64,
    pub frames_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
    pub overflow_skips: u64,
    pub idle_ticks: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_sample_tick(&self) {
        self.sample_ticks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("telemetry_samples_total").increment(1);
    }

    pub fn record_sent(&self, bytes: usize) {
        self.transmit_ticks.fetch_add(1, Ordering::Relaxed);
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
        metrics::counter!("telemetry_frames_sent_total").increment(1);
    }

    pub fn record_send_failure(&self) {
        self.transmit_ticks.fetch_add(1, Ordering::Relaxed);
        self.send_failures.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("telemetry_send_failures_total").increment(1);
    }

    pub fn record_overflow(&self) {
        self.transmit_ticks.fetch_add(1, Ordering::Relaxed);
        self.overflow_skips.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("telemetry_overflow_skips_total").increment(1);
    }

    pub fn record_idle(&self) {
        self.transmit_ticks.fetch_add(1, Ordering::Relaxed);
        self.idle_ticks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("telemetry_idle_ticks_total").increment(1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sample_ticks: self.sample_ticks.load(Ordering::Relaxed),
            transmit_ticks: self.transmit_ticks.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            overflow_skips: self.overflow_skips.load(Ordering::Relaxed),
            idle_ticks: self.idle_ticks.load(Ordering::Relaxed),
        }
    }
}
