//! Error taxonomy for the RLE pipeline.
//!
//! Each public operation gets its own small `#[non_exhaustive]` enum instead
//! of one catch-all error.
//!
//! There is no "null transmitter/receiver" variant: taking `&mut
//! Transmitter`/`&mut Receiver` makes that case unrepresentable, so it is
//! simply absent here.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Neither CRC nor sequence-number protection is allowed.
    NoProtectionEnabled,
    /// `use_explicit_payload_header_map` is reserved and must stay `false`.
    ExplicitPayloadHeaderMapUnsupported,
    /// One of the `*_label_size` fields exceeds the 4-bit field width (> 15).
    LabelSizeOutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProtectionEnabled => {
                write!(f, "at least one of allow_alpdu_crc/allow_alpdu_sequence_number must be set")
            }
            Self::ExplicitPayloadHeaderMapUnsupported => {
                write!(f, "use_explicit_payload_header_map is reserved and unsupported")
            }
            Self::LabelSizeOutOfRange => write!(f, "a configured label size exceeds 15"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncapError {
    /// SDU exceeds [`crate::sdu::SDU_MAX_LEN`] bytes.
    SduTooBig,
    /// The fragment-id context already holds an ALPDU in flight.
    ContextBusy,
}

impl fmt::Display for EncapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SduTooBig => write!(f, "SDU exceeds the maximum supported size"),
            Self::ContextBusy => write!(f, "fragment-id context has an ALPDU already in flight"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FragmentError {
    /// The fragment-id context has no ALPDU queued (nothing to emit).
    ContextIsNull,
    /// `burst_size` cannot hold even the smallest valid PPDU.
    BurstTooSmall,
    /// Emitting at this burst size would split the trailer across two
    /// PPDUs; the caller must choose burst sizes that reserve trailer room.
    InvalidSize,
    /// `out` is shorter than the PPDU this call would produce.
    OutputTooSmall,
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextIsNull => write!(f, "fragment-id context is idle, nothing to fragment"),
            Self::BurstTooSmall => write!(f, "burst_size too small to carry a PPDU header and payload"),
            Self::InvalidSize => write!(f, "burst size would split the trailer across PPDUs"),
            Self::OutputTooSmall => write!(f, "output buffer shorter than the PPDU produced"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackError {
    /// `ppdu` is empty.
    InvalidPpdu,
    /// Label is present with a size outside {0, 3, 6}.
    InvalidLabel,
    /// `fpdu` has insufficient `remaining` room.
    FpduTooSmall,
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPpdu => write!(f, "ppdu is empty"),
            Self::InvalidLabel => write!(f, "label size must be 0, 3 or 6 bytes"),
            Self::FpduTooSmall => write!(f, "fpdu has insufficient remaining room"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecapError {
    /// `fpdu` is empty or shorter than the requested payload label.
    InvalidFpdu,
    /// The output SDU slice is empty.
    InvalidSdus,
    /// The label output slice has a size outside {0, 3, 6}.
    InvalidLabel,
    /// A PPDU declares a length exceeding the remaining FPDU bytes; parsing
    /// of this FPDU was aborted at that point. `delivered` SDUs were
    /// published before the abort.
    Malformed { delivered: usize },
    /// The SDU output slots filled up before the FPDU was fully parsed.
    /// `delivered` SDUs were written before the overflow was detected.
    SomeDrop { delivered: usize },
    /// At least one PPDU failed reassembly or protection validation; its
    /// context was flushed. `delivered` SDUs were still published.
    ReassemblyError { delivered: usize },
}

impl fmt::Display for DecapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFpdu => write!(f, "fpdu is empty or shorter than the payload label"),
            Self::InvalidSdus => write!(f, "sdus_out slice is empty"),
            Self::InvalidLabel => write!(f, "payload label size must be 0, 3 or 6 bytes"),
            Self::Malformed { delivered } => {
                write!(f, "a PPDU length exceeds the remaining FPDU bytes ({delivered} SDUs delivered)")
            }
            Self::SomeDrop { delivered } => {
                write!(f, "SDU output slots exhausted after delivering {delivered}")
            }
            Self::ReassemblyError { delivered } => {
                write!(f, "reassembly failed for at least one PPDU ({delivered} SDUs delivered)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReassemblyError {
    /// Fragment arrived out of order (e.g. CONT/END before START).
    OutOfOrder,
    /// Reassembled length does not match the `total_length` declared by
    /// START.
    LengthMismatch,
    /// Sequence number or CRC-32 trailer did not validate.
    ProtectionFailed,
    /// Unknown compressed protocol-type code, or implicit type could not be
    /// inferred from the SDU content.
    UnknownProtocolType,
    /// Fragment payload does not fit in the reassembly buffer bound by
    /// `total_length`.
    Overflow,
    /// A COMPLETE PPDU arrived but all eight frag_id contexts are currently
    /// armed with an in-flight fragmented ALPDU.
    NoFreeContext,
}

impl fmt::Display for ReassemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder => write!(f, "fragment arrived out of order"),
            Self::LengthMismatch => write!(f, "reassembled length does not match total_length"),
            Self::ProtectionFailed => write!(f, "sequence number or CRC-32 trailer mismatch"),
            Self::UnknownProtocolType => write!(f, "protocol type unknown or uninferable"),
            Self::Overflow => write!(f, "fragment payload overflows the reassembly buffer"),
            Self::NoFreeContext => write!(f, "no free frag_id context available for a COMPLETE PPDU"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderSizeError {
    /// `get_header_size` was asked about a traffic FPDU, whose overhead
    /// depends on run-time ptype-omission/protection choices.
    NonDeterministic,
}

impl fmt::Display for HeaderSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonDeterministic => {
                write!(f, "traffic FPDU overhead is not deterministic ahead of encapsulation")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub(crate) enum HeaderError {
    Truncated,
}
