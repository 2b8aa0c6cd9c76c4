//! Telemetry Frame Codec
//!
//! Wire format, one frame per line:
//!
//! ```text
//! <uptime_ms>,<ch0>,<ch1>,...,<chN-1>,<CRC16_hex4>\n
//! ```
//!
//! The CRC is CRC-16/CCITT-FALSE over everything before the last comma.

mod crc16;
mod decoder;
mod error;
mod framer;
mod header;
mod record;

pub use crc16::{crc16, CRC_FIELD_LEN};
pub use decoder::decode_frame;
pub use error::FrameError;
pub use framer::{Framer, FramerConfig, DEFAULT_TX_BUFFER_CAPACITY};
pub use header::{is_session_header, session_header};
pub use record::{DecodedFrame, TelemetryRecord};
