//! Frame assembly into a fixed transmit buffer

use crate::crc16::{crc16, CRC_FIELD_LEN};
use crate::error::FrameError;
use crate::record::TelemetryRecord;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use tracing::trace;

/// Default transmit buffer size in bytes
pub const DEFAULT_TX_BUFFER_CAPACITY: usize = 256;

/// Framer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Transmit buffer size in bytes (default: 256)
    pub tx_buffer_capacity: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            tx_buffer_capacity: DEFAULT_TX_BUFFER_CAPACITY,
        }
    }
}

/// Serializes records into a transmit buffer that is allocated once and
/// overwritten on every frame.
///
/// The final byte of the buffer is reserved, so a frame is accepted only when
/// payload, checksum field and newline together are strictly shorter than the
/// capacity. Frames that do not fit are rejected whole; nothing is truncated.
#[derive(Debug)]
pub struct Framer {
    buf: Box<[u8]>,
    len: usize,
}

impl Framer {
    /// Create a framer from configuration
    pub fn new(config: &FramerConfig) -> Self {
        Self::with_capacity(config.tx_buffer_capacity)
    }

    /// Create a framer with a transmit buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Transmit buffer size in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Longest frame (including newline) that will be emitted
    pub fn max_frame_len(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }

    /// Encode `record` as a complete frame and return its bytes.
    ///
    /// On [`FrameError::Overflow`] no frame is available; the previous frame
    /// is discarded as well.
    pub fn encode(&mut self, record: &TelemetryRecord<'_>) -> Result<&[u8], FrameError> {
        self.len = 0;
        let capacity = self.buf.len();
        let limit = self.max_frame_len();

        let mut cursor = SliceCursor {
            buf: &mut self.buf[..limit],
            pos: 0,
        };

        if write!(cursor, "{}", record).is_err() {
            return Err(overflow(record, capacity));
        }
        let payload_len = cursor.pos;
        let crc = crc16(&cursor.buf[..payload_len]);

        if write!(cursor, ",{:04X}\n", crc).is_err() {
            return Err(overflow(record, capacity));
        }

        self.len = cursor.pos;
        trace!("Encoded {} byte frame, crc {:04X}", self.len, crc);
        Ok(&self.buf[..self.len])
    }

    /// Most recently encoded frame, empty after an overflow
    pub fn last_frame(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

fn overflow(record: &TelemetryRecord<'_>, capacity: usize) -> FrameError {
    FrameError::Overflow {
        needed: record.payload_len() + CRC_FIELD_LEN + 1,
        capacity,
    }
}

/// `fmt::Write` over a fixed slice; a write that does not fit is refused whole
struct SliceCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for SliceCursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_frame;

    #[test]
    fn test_golden_frame() {
        let mut framer = Framer::with_capacity(256);
        let record = TelemetryRecord::new(1000, &[100, -200]);

        let frame = framer.encode(&record).unwrap();

        assert_eq!(frame, b"1000,100,-200,2D29\n");
    }

    #[test]
    fn test_eight_channel_frame_decodes() {
        let mut framer = Framer::new(&FramerConfig::default());
        let channels = [0, 32767, 205, 32766, -1, -32768, 12, 7];
        let record = TelemetryRecord::new(123_456, &channels);

        let frame = framer.encode(&record).unwrap().to_vec();
        let decoded = decode_frame(&frame).unwrap();

        assert_eq!(decoded.timestamp_ms, 123_456);
        assert_eq!(decoded.channels, channels);
    }

    #[test]
    fn test_overflow_sends_nothing() {
        // "1000,100,-200" is 13 bytes; with ",XXXX\n" the frame is 19
        let mut framer = Framer::with_capacity(10);
        let record = TelemetryRecord::new(1000, &[100, -200]);

        let err = framer.encode(&record).unwrap_err();

        assert_eq!(
            err,
            FrameError::Overflow {
                needed: 19,
                capacity: 10
            }
        );
        assert!(framer.last_frame().is_empty());
    }

    #[test]
    fn test_twenty_five_byte_record_in_twenty_byte_buffer() {
        // payload 19 bytes + ",XXXX" = 24, + newline = 25
        let channels = [1000, 2000, 3000];
        let record = TelemetryRecord::new(1234, &channels);
        assert_eq!(record.payload_len() + CRC_FIELD_LEN + 1, 25);

        let mut framer = Framer::with_capacity(20);
        assert!(framer.encode(&record).is_err());
        assert!(framer.last_frame().is_empty());
    }

    #[test]
    fn test_capacity_boundary() {
        // payload "1000,100,-200" (13) + ",2D29" (5) = 18
        let record = TelemetryRecord::new(1000, &[100, -200]);
        let checked_len = record.payload_len() + CRC_FIELD_LEN;

        // payload + checksum == capacity - 1 is rejected
        let mut tight = Framer::with_capacity(checked_len + 1);
        assert!(tight.encode(&record).is_err());

        // one byte shorter is sent
        let mut roomy = Framer::with_capacity(checked_len + 2);
        let frame = roomy.encode(&record).unwrap();
        assert_eq!(frame.len(), checked_len + 1);
        assert_eq!(frame.last(), Some(&b'\n'));
    }

    #[test]
    fn test_overflow_discards_previous_frame() {
        let mut framer = Framer::with_capacity(20);
        framer.encode(&TelemetryRecord::new(1, &[1])).unwrap();
        assert!(!framer.last_frame().is_empty());

        let wide = [i16::MIN; 4];
        assert!(framer.encode(&TelemetryRecord::new(1, &wide)).is_err());
        assert!(framer.last_frame().is_empty());
    }

    #[test]
    fn test_zero_capacity() {
        let mut framer = Framer::with_capacity(0);
        assert!(framer.encode(&TelemetryRecord::new(0, &[])).is_err());
    }

    #[test]
    fn test_buffer_reused() {
        let mut framer = Framer::with_capacity(64);
        let first = framer.encode(&TelemetryRecord::new(10, &[1, 2])).unwrap().to_vec();
        let second = framer.encode(&TelemetryRecord::new(20, &[3])).unwrap().to_vec();

        assert!(first.starts_with(b"10,1,2,"));
        assert!(second.starts_with(b"20,3,"));
        assert_eq!(framer.capacity(), 64);
    }
}
