//! Receiver-side frame verification

use crate::crc16::crc16;
use crate::error::FrameError;
use crate::record::DecodedFrame;

/// Verify and parse one frame line.
///
/// Accepts a trailing `\n` or `\r\n`. The checksum field must be exactly four
/// hex digits and must match the CRC recomputed over the payload.
pub fn decode_frame(line: &[u8]) -> Result<DecodedFrame, FrameError> {
    let text = std::str::from_utf8(line)
        .map_err(|e| FrameError::InvalidFormat(format!("not UTF-8: {}", e)))?;
    let text = text.trim_end_matches(['\n', '\r']);

    let (payload, crc_field) = text
        .rsplit_once(',')
        .ok_or_else(|| FrameError::InvalidFormat("missing checksum field".to_string()))?;

    if crc_field.len() != 4 || !crc_field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FrameError::InvalidFormat(format!(
            "checksum field {:?} is not 4 hex digits",
            crc_field
        )));
    }
    let received = u16::from_str_radix(crc_field, 16)
        .map_err(|e| FrameError::InvalidFormat(e.to_string()))?;

    let calculated = crc16(payload.as_bytes());
    if received != calculated {
        return Err(FrameError::ChecksumMismatch {
            expected: received,
            actual: calculated,
        });
    }

    let mut fields = payload.split(',');
    let timestamp_ms = fields
        .next()
        .and_then(|f| f.parse::<u64>().ok())
        .ok_or_else(|| FrameError::InvalidFormat(format!("bad timestamp in {:?}", payload)))?;

    let channels = fields
        .map(|f| {
            f.parse::<i16>()
                .map_err(|_| FrameError::InvalidFormat(format!("bad channel value {:?}", f)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedFrame {
        timestamp_ms,
        channels,
        crc: received,
    })
}
