//! Telemetry records

use std::fmt;

/// Snapshot taken at framing time: uptime plus the latest sample per channel.
///
/// Borrowed from the framer's scratch so building one never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryRecord<'a> {
    /// Device uptime (ms)
    pub timestamp_ms: u64,
    /// Latest sample per channel, ascending channel index
    pub channels: &'a [i16],
}

impl<'a> TelemetryRecord<'a> {
    pub fn new(timestamp_ms: u64, channels: &'a [i16]) -> Self {
        Self {
            timestamp_ms,
            channels,
        }
    }

    /// Length of the serialized payload (without checksum or terminator)
    pub fn payload_len(&self) -> usize {
        let mut counter = LenCounter(0);
        // Writing to a counter cannot fail
        let _ = fmt::Write::write_fmt(&mut counter, format_args!("{}", self));
        counter.0
    }
}

/// Payload layout: `<uptime_ms>,<ch0>,...,<chN-1>`
impl fmt::Display for TelemetryRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp_ms)?;
        for value in self.channels {
            write!(f, ",{}", value)?;
        }
        Ok(())
    }
}

struct LenCounter(usize);

impl fmt::Write for LenCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// A verified frame as seen by a receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Device uptime (ms)
    pub timestamp_ms: u64,
    /// Channel values, ascending channel index
    pub channels: Vec<i16>,
    /// Checksum carried by the frame
    pub crc: u16,
}

impl DecodedFrame {
    /// Borrow as a record, e.g. to re-encode
    pub fn as_record(&self) -> TelemetryRecord<'_> {
        TelemetryRecord::new(self.timestamp_ms, &self.channels)
    }
}
