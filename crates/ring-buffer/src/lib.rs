//! Lock-Free Channel Rings
//!
//! Fixed-capacity, overwrite-on-full sample storage with one ring per
//! acquisition channel. Each ring has exactly one writer (the sampler) and
//! one reader (the framer) and uses no locks.

mod bank;
mod buffer;
mod error;

pub use bank::{ChannelBank, SampleReader, SampleWriter, DEFAULT_CHANNELS};
pub use buffer::{ChannelRing, DEFAULT_CAPACITY};
pub use error::RingError;
