//! Sample generator driven by the high-rate tick

use crate::config::GeneratorConfig;
use crate::oscillator::{Oscillator, Waveform};
use ring_buffer::SampleWriter;
use tracing::info;

/// Source of one sample per channel per tick.
///
/// Implementations run in the time-critical tick: they must not block,
/// sleep, or allocate.
pub trait SampleSource: Send {
    /// Number of channels produced per tick
    fn channels(&self) -> usize;

    /// Write the current sample of every channel into `out` and advance
    fn sample_into(&mut self, out: &mut [i16]);
}

/// Sine/cosine synthesizer, one oscillator per channel
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    oscillators: Vec<Oscillator>,
}

impl SyntheticSource {
    /// Build one oscillator per configured frequency
    pub fn new(config: &GeneratorConfig) -> Self {
        let oscillators = config
            .frequencies_hz
            .iter()
            .enumerate()
            .map(|(channel, &freq)| {
                Oscillator::new(Waveform::for_channel(channel), freq, config.sample_rate_hz)
            })
            .collect();

        Self { oscillators }
    }

    /// Generation state of a channel
    pub fn oscillator(&self, channel: usize) -> Option<&Oscillator> {
        self.oscillators.get(channel)
    }
}

impl SampleSource for SyntheticSource {
    fn channels(&self) -> usize {
        self.oscillators.len()
    }

    fn sample_into(&mut self, out: &mut [i16]) {
        for (slot, osc) in out.iter_mut().zip(self.oscillators.iter_mut()) {
            *slot = osc.sample();
            osc.advance();
        }
    }
}

/// Pushes exactly one sample per channel into the rings on every tick
pub struct SampleGenerator<S: SampleSource> {
    source: S,
    writer: SampleWriter,
    /// Reused per-tick scratch
    scratch: Vec<i16>,
    ticks: u64,
}

impl<S: SampleSource> SampleGenerator<S> {
    /// Create a generator writing into `writer`.
    ///
    /// Channels beyond the smaller of the source and ring counts are ignored.
    pub fn new(source: S, writer: SampleWriter) -> Self {
        let channels = source.channels().min(writer.channels());
        info!(
            "Sample generator created for {} channels ({} source, {} rings)",
            channels,
            source.channels(),
            writer.channels()
        );
        Self {
            source,
            writer,
            scratch: vec![0; channels],
            ticks: 0,
        }
    }

    /// One sample tick: read every channel and push it into its ring
    #[inline]
    pub fn tick(&mut self) {
        self.source.sample_into(&mut self.scratch);
        for (channel, &value) in self.scratch.iter().enumerate() {
            self.writer.push(channel, value);
        }
        self.ticks += 1;
    }

    /// Ticks executed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of channels written per tick
    pub fn channels(&self) -> usize {
        self.scratch.len()
    }

    /// Source feeding the rings
    pub fn source(&self) -> &S {
        &self.source
    }
}
