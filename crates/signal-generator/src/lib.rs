//! Sample Generator
//!
//! Produces one sample per channel per tick and pushes it into the channel
//! rings. The default source synthesizes sine/cosine waves from a phase
//! accumulator; a hardware read can be substituted through [`SampleSource`].

mod config;
mod generator;
mod oscillator;

pub use config::GeneratorConfig;
pub use generator::{SampleGenerator, SampleSource, SyntheticSource};
pub use oscillator::{Oscillator, Waveform, AMPLITUDE};
