//! Pipeline configuration

use crate::error::PipelineError;
use frame_codec::FramerConfig;
use serde::{Deserialize, Serialize};
use signal_generator::GeneratorConfig;
use std::time::Duration;

/// Fastest schedulable tick rate (1 µs period)
pub const MAX_RATE_HZ: f64 = 1_000_000.0;
/// Slowest schedulable tick rate (1000 s period)
pub const MIN_RATE_HZ: f64 = 0.001;

/// Tick rates and timing budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Sample tick rate in Hz (default: 1000)
    pub sample_rate_hz: f64,
    /// Transmit tick rate in Hz (default: 100)
    pub transmit_rate_hz: f64,
    /// Upper bound on one transport send in milliseconds
    pub send_timeout_ms: u64,
    /// Status report interval in seconds
    pub status_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000.0,
            transmit_rate_hz: 100.0,
            send_timeout_ms: 5,
            status_interval_secs: 5,
        }
    }
}

impl ScheduleConfig {
    pub fn sample_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sample_rate_hz)
    }

    pub fn transmit_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.transmit_rate_hz)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }
}

/// Everything the pipeline needs at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples retained per channel ring (default: 1024)
    pub ring_capacity: usize,
    pub generator: GeneratorConfig,
    pub framer: FramerConfig,
    pub schedule: ScheduleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ring_capacity: ring_buffer::DEFAULT_CAPACITY,
            generator: GeneratorConfig::default(),
            framer: FramerConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations that cannot be scheduled
    pub fn validate(&self) -> Result<(), PipelineError> {
        let schedule = &self.schedule;
        check_rate("sample", schedule.sample_rate_hz)?;
        check_rate("transmit", schedule.transmit_rate_hz)?;
        if schedule.transmit_rate_hz > schedule.sample_rate_hz {
            return Err(PipelineError::Config(format!(
                "transmit rate {} Hz exceeds sample rate {} Hz",
                schedule.transmit_rate_hz, schedule.sample_rate_hz
            )));
        }
        if schedule.send_timeout_ms == 0 {
            return Err(PipelineError::Config("send timeout must be non-zero".to_string()));
        }
        if self.ring_capacity == 0 {
            return Err(PipelineError::Config("ring capacity must be non-zero".to_string()));
        }
        if self.framer.tx_buffer_capacity == 0 {
            return Err(PipelineError::Config(
                "transmit buffer capacity must be non-zero".to_string(),
            ));
        }
        if self.generator.channels() == 0 {
            return Err(PipelineError::Config("at least one channel is required".to_string()));
        }
        let nyquist = schedule.sample_rate_hz / 2.0;
        for (channel, freq) in self.generator.frequencies_hz.iter().enumerate() {
            let freq = f64::from(*freq);
            if !(freq.is_finite() && freq.abs() < nyquist) {
                return Err(PipelineError::Config(format!(
                    "channel {} frequency {} Hz must be finite and below {} Hz",
                    channel, freq, nyquist
                )));
            }
        }
        if (self.generator.sample_rate_hz - schedule.sample_rate_hz).abs() > f64::EPSILON {
            return Err(PipelineError::Config(format!(
                "generator rate {} Hz differs from sample tick rate {} Hz",
                self.generator.sample_rate_hz, schedule.sample_rate_hz
            )));
        }
        Ok(())
    }
}

fn check_rate(name: &str, rate_hz: f64) -> Result<(), PipelineError> {
    if !(MIN_RATE_HZ..=MAX_RATE_HZ).contains(&rate_hz) {
        return Err(PipelineError::Config(format!(
            "{} rate must be within {}..={} Hz, got {}",
            name, MIN_RATE_HZ, MAX_RATE_HZ, rate_hz
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.sample_period(), Duration::from_millis(1));
        assert_eq!(config.schedule.transmit_period(), Duration::from_millis(10));
        assert_eq!(config.generator.channels(), 8);
    }

    #[test]
    fn test_rejects_zero_rates() {
        let mut config = PipelineConfig::default();
        config.schedule.transmit_rate_hz = 0.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_rejects_transmit_faster_than_sampling() {
        let mut config = PipelineConfig::default();
        config.schedule.transmit_rate_hz = 2000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_no_channels() {
        let mut config = PipelineConfig::default();
        config.generator.frequencies_hz.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_mismatched_generator_rate() {
        let mut config = PipelineConfig::default();
        config.generator.sample_rate_hz = 500.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unschedulable_rates() {
        for rate in [1e-320, 1e-9, 1e12, f64::NAN, f64::INFINITY, -1.0] {
            let mut config = PipelineConfig::default();
            config.schedule.transmit_rate_hz = rate;
            assert!(config.validate().is_err(), "transmit rate {}", rate);

            let mut config = PipelineConfig::default();
            config.schedule.sample_rate_hz = rate;
            config.generator.sample_rate_hz = rate;
            assert!(config.validate().is_err(), "sample rate {}", rate);
        }
    }

    #[test]
    fn test_rate_bounds_give_usable_periods() {
        let mut config = PipelineConfig::default();
        config.schedule.sample_rate_hz = MAX_RATE_HZ;
        config.generator.sample_rate_hz = MAX_RATE_HZ;
        config.schedule.transmit_rate_hz = MIN_RATE_HZ;
        assert!(config.validate().is_ok());

        let fastest = config.schedule.sample_period();
        assert!(fastest > Duration::ZERO && fastest <= Duration::from_micros(1));
        let slowest = config.schedule.transmit_period();
        assert!(slowest.as_secs_f64() > 999.0 && slowest.as_secs_f64() < 1001.0);
    }

    #[test]
    fn test_rejects_frequencies_at_or_above_nyquist() {
        for freq in [500.0, -500.0, 1.0e12, f32::INFINITY, f32::NAN] {
            let mut config = PipelineConfig::default();
            config.generator.frequencies_hz[3] = freq;
            assert!(config.validate().is_err(), "frequency {}", freq);
        }

        let mut config = PipelineConfig::default();
        config.generator.frequencies_hz[3] = 499.0;
        assert!(config.validate().is_ok());
    }
}
