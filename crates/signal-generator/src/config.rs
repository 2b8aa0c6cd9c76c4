//! Generator configuration

use serde::{Deserialize, Serialize};

/// Synthetic waveform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Sample tick rate in Hz (default: 1000)
    pub sample_rate_hz: f64,
    /// Per-channel waveform frequency in Hz; its length is the channel count
    pub frequencies_hz: Vec<f32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000.0,
            frequencies_hz: vec![1.0, 2.0, 3.0, 5.0, 8.0, 10.0, 13.0, 20.0],
        }
    }
}

impl GeneratorConfig {
    /// Config with `channels` channels at 1, 2, 3, ... Hz
    pub fn with_channels(channels: usize) -> Self {
        Self {
            frequencies_hz: (1..=channels).map(|f| f as f32).collect(),
            ..Default::default()
        }
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.frequencies_hz.len()
    }
}
