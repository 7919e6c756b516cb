//! SDU types and the compressed protocol-type table.

use rle_util::allocator::{Allocator, Vec};

/// Largest SDU this implementation will encapsulate.
pub const SDU_MAX_LEN: usize = 4088;

/// Largest ALPDU (protocol-type header + SDU + trailer) a single context
/// can hold.
pub const ALPDU_MAX_LEN: usize = 4095;

/// A 16-bit protocol-type tag, as carried (explicitly or implicitly) by an
/// ALPDU.
///
/// This is a thin wrapper rather than a closed enum: real traffic carries
/// ethertypes this crate has no opinion about, and only a handful of values
/// (the ones with compressed codes, plus the signaling sentinel) are special
/// to RLE itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolType(pub u16);

impl ProtocolType {
    pub const IPV4: Self = Self(0x0800);
    pub const IPV6: Self = Self(0x86DD);
    pub const ARP: Self = Self(0x0806);
    pub const VLAN: Self = Self(0x8100);
    pub const QINQ: Self = Self(0x88A8);
    /// Sentinel identifying an RLE signaling PDU rather than a user SDU.
    pub const SIGNALING: Self = Self(0x0082);
}

/// One row of the compressed protocol-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompressedPtypeRow {
    code: u8,
    ptype: u16,
}

const COMPRESSED_PTYPE_TABLE: &[CompressedPtypeRow] = &[
    CompressedPtypeRow { code: PTYPE_COMPRESSED_IP, ptype: ProtocolType::IPV4.0 },
    CompressedPtypeRow { code: PTYPE_COMPRESSED_ARP, ptype: ProtocolType::ARP.0 },
    CompressedPtypeRow { code: PTYPE_COMPRESSED_VLAN, ptype: ProtocolType::VLAN.0 },
    CompressedPtypeRow { code: PTYPE_COMPRESSED_IPV6, ptype: ProtocolType::IPV6.0 },
];

/// Compressed code for IPv4. Doubles as the `implicit_protocol_type`
/// sentinel that triggers IP-version inference when the ptype header is
/// omitted.
pub const PTYPE_COMPRESSED_IP: u8 = 0x0d;
pub const PTYPE_COMPRESSED_ARP: u8 = 0x0e;
/// Compressed code for VLAN. Doubles as the `implicit_protocol_type`
/// sentinel for "VLAN-tagged frame, inner ethertype not carried".
pub const PTYPE_COMPRESSED_VLAN: u8 = 0x0f;
pub const PTYPE_COMPRESSED_IPV6: u8 = 0x11;

/// Looks up the 16-bit protocol type for a compressed code.
pub fn decompress_ptype(code: u8) -> Option<u16> {
    COMPRESSED_PTYPE_TABLE.iter().find(|row| row.code == code).map(|row| row.ptype)
}

/// Looks up the compressed code for a 16-bit protocol type.
pub fn compress_ptype(ptype: ProtocolType) -> Option<u8> {
    COMPRESSED_PTYPE_TABLE.iter().find(|row| row.ptype == ptype.0).map(|row| row.code)
}

/// Inspects the first bytes of an SDU that is Ethernet-VLAN-tagged and
/// reports whether the inner ethertype is IPv4 or IPv6 (bytes 2-3 hold the
/// ethertype that follows the 2-byte VLAN TCI).
pub(crate) fn is_eth_vlan_ip_frame(sdu: &[u8]) -> bool {
    if sdu.len() < 4 {
        return false;
    }
    let inner = u16::from_be_bytes([sdu[2], sdu[3]]);
    inner == ProtocolType::IPV4.0 || inner == ProtocolType::IPV6.0
}

/// A borrowed SDU, as handed to [`crate::encap::encapsulate`].
#[derive(Debug, Clone, Copy)]
pub struct SduRef<'a> {
    pub protocol_type: ProtocolType,
    pub bytes: &'a [u8],
}

/// An owned, reassembled SDU, as delivered by [`crate::decap::decapsulate`].
///
/// Its bytes live in the same allocator the receiver's contexts were built
/// with; the reassembly buffer is handed off by value rather than copied.
#[derive(Debug)]
pub struct Sdu<A: Allocator> {
    pub protocol_type: ProtocolType,
    pub bytes: Vec<u8, A>,
}
