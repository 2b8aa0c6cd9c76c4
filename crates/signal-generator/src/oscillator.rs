//! Phase-accumulator oscillator

use std::f32::consts::TAU;

/// Full-scale amplitude of a synthesized sample
pub const AMPLITUDE: f32 = 32767.0;

/// Waveform shape of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Cosine,
}

impl Waveform {
    /// Even channels are sines, odd channels cosines
    pub fn for_channel(channel: usize) -> Self {
        if channel % 2 == 0 {
            Waveform::Sine
        } else {
            Waveform::Cosine
        }
    }
}

/// Per-channel generation state
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    step: f32,
    waveform: Waveform,
}

impl Oscillator {
    /// Create an oscillator at phase zero advancing `frequency_hz` cycles per second
    pub fn new(waveform: Waveform, frequency_hz: f32, sample_rate_hz: f64) -> Self {
        let step = TAU as f64 * frequency_hz as f64 / sample_rate_hz;
        // Whole turns per tick are invisible in the output; keep one step under 2π
        // so the wrap in `advance` subtracts at most once
        let step = if step.is_finite() {
            step.rem_euclid(TAU as f64) as f32
        } else {
            0.0
        };
        Self {
            phase: 0.0,
            step,
            waveform,
        }
    }

    /// Current sample, truncated toward zero into the signed 16-bit range
    #[inline]
    pub fn sample(&self) -> i16 {
        let unit = match self.waveform {
            Waveform::Sine => self.phase.sin(),
            Waveform::Cosine => self.phase.cos(),
        };
        // `as` truncates toward zero and saturates
        (unit * AMPLITUDE) as i16
    }

    /// Advance the phase by one tick, keeping it in `[0, 2π)`
    #[inline]
    pub fn advance(&mut self) {
        self.phase = wrap_phase(self.phase + self.step);
    }

    /// Current phase in radians
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Phase increment per tick in radians
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Shape this oscillator produces
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}

/// Subtractive wrap into `[0, 2π)`
#[inline]
fn wrap_phase(mut phase: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }
    while phase >= TAU {
        phase -= TAU;
    }
    while phase < 0.0 {
        phase += TAU;
        // -ε + 2π can round up to exactly 2π
        if phase >= TAU {
            phase = 0.0;
        }
    }
    phase
}
