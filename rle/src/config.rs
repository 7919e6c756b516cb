//! The static, per-channel configuration shared by a transmitter and its
//! peer receiver.
//!
//! Matches `rle_config_check()`/`ptype_is_omissible()` of the reference
//! implementation: a plain struct with a fallible `check()`, not a builder.
//! Both ends of a channel must be constructed with an identical `Config` --
//! the wire format carries no per-packet indication of these choices for
//! fragmented ALPDUs, only for COMPLETE PPDUs via their label-type field.

use crate::sdu::{is_eth_vlan_ip_frame, ProtocolType, PTYPE_COMPRESSED_IP, PTYPE_COMPRESSED_VLAN};
use crate::error::ConfigError;

/// Maximum value a 4-bit label-size field can carry.
const LABEL_SIZE_FIELD_MAX: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct Config {
    /// Allow omitting the protocol-type header entirely when it is
    /// inferable from `implicit_protocol_type` and the SDU content.
    pub allow_ptype_omission: bool,
    /// When the header is not omitted, use the 1-byte compressed code
    /// instead of the 2-byte uncompressed ethertype.
    pub use_compressed_ptype: bool,
    /// Allow CRC-32 ALPDU protection.
    pub allow_alpdu_crc: bool,
    /// Allow 1-byte sequence-number ALPDU protection.
    pub allow_alpdu_sequence_number: bool,
    /// Reserved; must stay `false`.
    pub use_explicit_payload_header_map: bool,
    /// Compressed-ptype code (or one of the two inference sentinels) used
    /// when `allow_ptype_omission` applies.
    pub implicit_protocol_type: u8,
    /// Label size carried by a COMPLETE PPDU's LOGON/CTRL framing.
    pub implicit_ppdu_label_size: u8,
    pub implicit_payload_label_size: u8,
    pub type_0_alpdu_label_size: u8,
}

impl Config {
    pub fn check(&self) -> Result<(), ConfigError> {
        if !self.allow_alpdu_crc && !self.allow_alpdu_sequence_number {
            return Err(ConfigError::NoProtectionEnabled);
        }
        if self.use_explicit_payload_header_map {
            return Err(ConfigError::ExplicitPayloadHeaderMapUnsupported);
        }
        for size in [
            self.implicit_ppdu_label_size,
            self.implicit_payload_label_size,
            self.type_0_alpdu_label_size,
        ] {
            if size > LABEL_SIZE_FIELD_MAX {
                return Err(ConfigError::LabelSizeOutOfRange);
            }
        }
        Ok(())
    }

    /// Whether protection is CRC-32 or sequence-number; CRC is preferred
    /// when a config permits both (see DESIGN.md).
    pub fn protection(&self) -> ProtectionMode {
        if self.allow_alpdu_crc {
            ProtectionMode::Crc
        } else {
            ProtectionMode::SeqNo
        }
    }

    /// Mirrors `ptype_is_omissible()`: true when `ptype`/`sdu` are
    /// consistent with this config's `implicit_protocol_type` inference
    /// rule, i.e. the protocol-type header can be safely left off.
    pub fn ptype_is_omissible(&self, ptype: ProtocolType, sdu: &[u8]) -> bool {
        if !self.allow_ptype_omission {
            return false;
        }
        if ptype == ProtocolType::SIGNALING {
            return true;
        }
        match self.implicit_protocol_type {
            PTYPE_COMPRESSED_IP => {
                let ip_version = sdu.first().map(|b| b >> 4);
                (ptype == ProtocolType::IPV4 && ip_version == Some(4))
                    || (ptype == ProtocolType::IPV6 && ip_version == Some(6))
            }
            PTYPE_COMPRESSED_VLAN => ptype == ProtocolType::VLAN && is_eth_vlan_ip_frame(sdu),
            code => crate::sdu::decompress_ptype(code) == Some(ptype.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionMode {
    SeqNo,
    Crc,
}

impl ProtectionMode {
    pub const fn trailer_len(self) -> usize {
        match self {
            Self::SeqNo => 1,
            Self::Crc => 4,
        }
    }
}
