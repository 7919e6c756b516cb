//! ALPDU trailer encode/verify: either a 1-byte SeqNo (mod 256) or a 4-byte
//! CRC-32, transmitted little-endian.

use byteorder::{ByteOrder, LittleEndian};

use crate::config::ProtectionMode;
use crate::crc::Crc32;

pub(crate) fn write_seqno(out: &mut [u8], seqno: u8) {
    out[0] = seqno;
}

pub(crate) fn write_crc(out: &mut [u8], crc: u32) {
    LittleEndian::write_u32(&mut out[..4], crc);
}

pub(crate) fn read_seqno(bytes: &[u8]) -> u8 {
    bytes[0]
}

pub(crate) fn read_crc(bytes: &[u8]) -> u32 {
    LittleEndian::read_u32(&bytes[..4])
}

/// Computes the CRC-32 that protects an ALPDU: over the *uncompressed*
/// 2-byte protocol type followed by the SDU bytes, regardless of how the
/// protocol type was actually encoded on the wire (omitted or compressed).
pub(crate) fn compute_alpdu_crc(crc: &dyn Crc32, ptype: u16, sdu: &[u8]) -> u32 {
    let ptype_be = ptype.to_be_bytes();
    crc.checksum(&[&ptype_be, sdu])
}

/// Verifies a received trailer against the expected protection state.
pub(crate) fn verify(
    mode: ProtectionMode,
    trailer: &[u8],
    crc: &dyn Crc32,
    ptype: u16,
    sdu: &[u8],
    expected_seqno: Option<u8>,
) -> bool {
    match mode {
        ProtectionMode::SeqNo => match expected_seqno {
            Some(expected) => read_seqno(trailer) == expected,
            None => true,
        },
        ProtectionMode::Crc => read_crc(trailer) == compute_alpdu_crc(crc, ptype, sdu),
    }
}
