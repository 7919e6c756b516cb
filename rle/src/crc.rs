//! The CRC-32 collaborator the RLE core consumes: IEEE 802.3/CRC-32 over a
//! multi-part buffer via an incremental digest, so the protocol-type header
//! and SDU body never need to be copied into one contiguous region just to
//! checksum them.

use crc::{Crc, CRC_32_ISO_HDLC};

/// Computes CRC-32 over one or more disjoint byte ranges, so the protocol
/// header and the SDU body never need to be copied into one contiguous
/// buffer just to checksum them.
pub trait Crc32 {
    fn checksum(&self, parts: &[&[u8]]) -> u32;
}

/// IEEE 802.3 CRC-32 (reflected, polynomial 0xEDB88320, init/xorout
/// 0xFFFFFFFF).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ieee8023Crc32;

impl Crc32 for Ieee8023Crc32 {
    fn checksum(&self, parts: &[&[u8]]) -> u32 {
        static CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
        let mut digest = CRC.digest();
        for part in parts {
            digest.update(part);
        }
        digest.finalize()
    }
}
