//! Per-channel ring bank shared between the sampler and the framer

use crate::buffer::ChannelRing;
use crate::error::RingError;
use std::sync::Arc;
use tracing::debug;

/// Default number of acquisition channels
pub const DEFAULT_CHANNELS: usize = 8;

/// Fixed set of channel rings, sized once at initialization
#[derive(Debug)]
pub struct ChannelBank {
    rings: Box<[ChannelRing]>,
}

impl ChannelBank {
    /// Create a bank of `channels` rings, each holding `capacity` samples
    pub fn new(channels: usize, capacity: usize) -> Result<Self, RingError> {
        if channels == 0 {
            return Err(RingError::NoChannels);
        }
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }

        debug!("Allocating {} channel rings of {} samples", channels, capacity);
        let rings: Vec<ChannelRing> = (0..channels).map(|_| ChannelRing::new(capacity)).collect();

        Ok(Self {
            rings: rings.into_boxed_slice(),
        })
    }

    /// Split the bank into its single writer and a reader handle.
    ///
    /// The writer is not `Clone`, so only one context can ever push.
    pub fn split(self) -> (SampleWriter, SampleReader) {
        let rings: Arc<[ChannelRing]> = Arc::from(self.rings);
        (
            SampleWriter {
                rings: Arc::clone(&rings),
            },
            SampleReader { rings },
        )
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.rings.len()
    }

    /// Access a single channel ring
    pub fn ring(&self, channel: usize) -> Option<&ChannelRing> {
        self.rings.get(channel)
    }
}

/// Exclusive write side of a [`ChannelBank`]
#[derive(Debug)]
pub struct SampleWriter {
    rings: Arc<[ChannelRing]>,
}

impl SampleWriter {
    /// Push one sample into `channel`; out-of-range channels are ignored
    #[inline]
    pub fn push(&mut self, channel: usize, value: i16) {
        if let Some(ring) = self.rings.get(channel) {
            ring.push(value);
        }
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.rings.len()
    }
}

/// Read side of a [`ChannelBank`]
#[derive(Debug, Clone)]
pub struct SampleReader {
    rings: Arc<[ChannelRing]>,
}

impl SampleReader {
    /// Latest sample of `channel`, `None` before its first push
    pub fn latest(&self, channel: usize) -> Option<i16> {
        self.rings.get(channel).and_then(ChannelRing::latest)
    }

    /// Fill `out` with the latest sample per channel, `0` for channels
    /// without data. Returns how many channels had data.
    pub fn latest_into(&self, out: &mut [i16]) -> usize {
        let mut fresh = 0;
        for (slot, ring) in out.iter_mut().zip(self.rings.iter()) {
            match ring.latest() {
                Some(value) => {
                    *slot = value;
                    fresh += 1;
                }
                None => *slot = 0,
            }
        }
        fresh
    }

    /// Retained history of `channel`, oldest first
    pub fn snapshot(&self, channel: usize) -> Option<Vec<i16>> {
        self.rings.get(channel).map(ChannelRing::snapshot)
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.rings.len()
    }

    /// Per-channel ring capacity
    pub fn capacity(&self) -> usize {
        self.rings.first().map(ChannelRing::capacity).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_rejects_bad_sizes() {
        assert!(matches!(ChannelBank::new(0, 16), Err(RingError::NoChannels)));
        assert!(matches!(ChannelBank::new(8, 0), Err(RingError::ZeroCapacity)));
    }

    #[test]
    fn test_split_shares_rings() {
        let bank = ChannelBank::new(3, 4).unwrap();
        let (mut writer, reader) = bank.split();

        writer.push(0, 10);
        writer.push(2, -20);

        assert_eq!(reader.latest(0), Some(10));
        assert_eq!(reader.latest(1), None);
        assert_eq!(reader.latest(2), Some(-20));
        assert_eq!(reader.capacity(), 4);
    }

    #[test]
    fn test_latest_into_zero_fills_missing() {
        let bank = ChannelBank::new(4, 8).unwrap();
        let (mut writer, reader) = bank.split();
        writer.push(1, 42);
        writer.push(3, -1);

        let mut out = [99i16; 4];
        let fresh = reader.latest_into(&mut out);

        assert_eq!(fresh, 2);
        assert_eq!(out, [0, 42, 0, -1]);
    }

    #[test]
    fn test_out_of_range_channel_ignored() {
        let bank = ChannelBank::new(2, 4).unwrap();
        let (mut writer, reader) = bank.split();
        writer.push(5, 1);
        assert_eq!(reader.latest(5), None);
        assert_eq!(reader.snapshot(0), Some(vec![]));
    }
}
