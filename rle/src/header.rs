//! PPDU header codec.
//!
//! 16-bit big-endian header, packed with [`bitfield_struct::bitfield`]:
//! fields are declared from least- to most-significant bit so the raw value
//! lines up with a big-endian read of the wire bytes.
//!
//! START fragments carry an additional 16-bit continuation word
//! (`USE_CRC | frag_id(3) | total_length(12)`).

use bitfield_struct::bitfield;
use byteorder::{BigEndian, ByteOrder};

use crate::error::HeaderError;

pub const BASE_HEADER_LEN: usize = 2;
pub const START_CONTINUATION_LEN: usize = 2;
/// Largest value the 11-bit LENGTH field can carry.
pub const MAX_PPDU_PAYLOAD_LEN: u16 = 2047;
/// Largest value the 12-bit total_length field can carry.
pub const MAX_TOTAL_LENGTH: u16 = 4095;

#[bitfield(u16)]
struct RawHeader {
    #[bits(3)]
    lt_t_fid: u8,
    #[bits(11)]
    length: u16,
    end: bool,
    start: bool,
}

#[bitfield(u16)]
struct RawStartContinuation {
    #[bits(12)]
    total_length: u16,
    #[bits(3)]
    frag_id: u8,
    use_crc: bool,
}

/// LT_T_FID interpretation for a COMPLETE PPDU (S=1, E=1); for fragments the
/// same field carries a raw `frag_id` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    Legacy = 0,
    Reserved = 1,
    ImplicitPtypeOmitted = 2,
    Signaling = 3,
}

impl LabelType {
    const fn from_bits(v: u8) -> Self {
        match v {
            0 => Self::Legacy,
            1 => Self::Reserved,
            2 => Self::ImplicitPtypeOmitted,
            _ => Self::Signaling,
        }
    }

    const fn into_bits(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpduKind {
    Complete { label_type: LabelType, length: u16 },
    Start { frag_id: u8, length: u16, total_length: u16, use_crc: bool },
    Cont { frag_id: u8, length: u16 },
    End { frag_id: u8, length: u16 },
}

impl PpduKind {
    pub const fn header_len(&self) -> usize {
        match self {
            Self::Start { .. } => BASE_HEADER_LEN + START_CONTINUATION_LEN,
            _ => BASE_HEADER_LEN,
        }
    }

    /// The frag_id carried by a fragment header, or `None` for a COMPLETE
    /// PPDU (whose LT_T_FID field carries a label type instead).
    pub const fn frag_id(&self) -> Option<u8> {
        match *self {
            Self::Complete { .. } => None,
            Self::Start { frag_id, .. } | Self::Cont { frag_id, .. } | Self::End { frag_id, .. } => Some(frag_id),
        }
    }

    pub const fn length(&self) -> u16 {
        match *self {
            Self::Complete { length, .. }
            | Self::Start { length, .. }
            | Self::Cont { length, .. }
            | Self::End { length, .. } => length,
        }
    }
}

/// Parses a PPDU header from the front of `bytes`, returning the decoded
/// kind and the number of header bytes consumed.
pub(crate) fn parse_header(bytes: &[u8]) -> Result<(PpduKind, usize), HeaderError> {
    if bytes.len() < BASE_HEADER_LEN {
        return Err(HeaderError::Truncated);
    }
    let raw = RawHeader::from_bits(BigEndian::read_u16(&bytes[..2]));
    let length = raw.length();
    match (raw.start(), raw.end()) {
        (true, true) => Ok((
            PpduKind::Complete { label_type: LabelType::from_bits(raw.lt_t_fid()), length },
            BASE_HEADER_LEN,
        )),
        (true, false) => {
            if bytes.len() < BASE_HEADER_LEN + START_CONTINUATION_LEN {
                return Err(HeaderError::Truncated);
            }
            let cont = RawStartContinuation::from_bits(BigEndian::read_u16(&bytes[2..4]));
            Ok((
                PpduKind::Start {
                    frag_id: cont.frag_id(),
                    length,
                    total_length: cont.total_length(),
                    use_crc: cont.use_crc(),
                },
                BASE_HEADER_LEN + START_CONTINUATION_LEN,
            ))
        }
        (false, false) => Ok((PpduKind::Cont { frag_id: raw.lt_t_fid(), length }, BASE_HEADER_LEN)),
        (false, true) => Ok((PpduKind::End { frag_id: raw.lt_t_fid(), length }, BASE_HEADER_LEN)),
    }
}

pub(crate) fn write_header(out: &mut [u8], kind: PpduKind) {
    match kind {
        PpduKind::Complete { label_type, length } => {
            let raw = RawHeader::new()
                .with_start(true)
                .with_end(true)
                .with_length(length)
                .with_lt_t_fid(label_type.into_bits());
            BigEndian::write_u16(&mut out[..2], raw.into_bits());
        }
        PpduKind::Start { frag_id, length, total_length, use_crc } => {
            let raw = RawHeader::new()
                .with_start(true)
                .with_end(false)
                .with_length(length)
                .with_lt_t_fid(frag_id);
            BigEndian::write_u16(&mut out[..2], raw.into_bits());
            let cont = RawStartContinuation::new()
                .with_use_crc(use_crc)
                .with_frag_id(frag_id)
                .with_total_length(total_length);
            BigEndian::write_u16(&mut out[2..4], cont.into_bits());
        }
        PpduKind::Cont { frag_id, length } => {
            let raw = RawHeader::new()
                .with_start(false)
                .with_end(false)
                .with_length(length)
                .with_lt_t_fid(frag_id);
            BigEndian::write_u16(&mut out[..2], raw.into_bits());
        }
        PpduKind::End { frag_id, length } => {
            let raw = RawHeader::new()
                .with_start(false)
                .with_end(true)
                .with_length(length)
                .with_lt_t_fid(frag_id);
            BigEndian::write_u16(&mut out[..2], raw.into_bits());
        }
    }
}

/// Detects the all-zero two-byte padding sentinel used to fill the tail of
/// an FPDU.
pub(crate) fn is_padding_marker(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0 && bytes[1] == 0
}
