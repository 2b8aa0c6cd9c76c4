//! CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection, no xorout)

use crc::{Crc, CRC_16_IBM_3740};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Length of the checksum trailer field including its leading comma (`,XXXX`)
pub const CRC_FIELD_LEN: usize = 5;

/// Compute the frame checksum over `bytes`
pub fn crc16(bytes: &[u8]) -> u16 {
    CRC16.checksum(bytes)
}
