//! FPDU overhead accounting (`rle_get_header_size` in `rle_conf.c`).
//!
//! Three of the four FPDU kinds carried over a DVB-RCS2 return link have an
//! overhead that is a pure function of [`Config`]; the fourth — ordinary
//! traffic — depends on the protection mode and ptype-omission choice made
//! per SDU at encapsulation time, so it has none.

use crate::config::Config;
use crate::error::HeaderSizeError;
use crate::header::BASE_HEADER_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpduKind {
    /// Logon FPDU: a 6-byte payload label, no PPDUs.
    Logon,
    /// Control FPDU: a 3-byte payload label, no PPDUs.
    Ctrl,
    /// Traffic-control FPDU: a 3-byte label plus exactly one COMPLETE PPDU
    /// carrying a zero-overhead ALPDU (no ptype header, no protection,
    /// no ALPDU label).
    TrafficCtrl,
    /// Ordinary traffic FPDU: overhead depends on the SDU and the
    /// ptype-omission/protection choices made per ALPDU.
    Traffic,
}

/// Computes the deterministic overhead (in bytes) of an FPDU of `kind`,
/// or reports that `kind`'s overhead cannot be known ahead of encapsulation.
pub fn header_size(_config: &Config, kind: FpduKind) -> Result<usize, HeaderSizeError> {
    match kind {
        FpduKind::Logon => Ok(6),
        FpduKind::Ctrl => Ok(3),
        FpduKind::TrafficCtrl => Ok(3 + BASE_HEADER_LEN),
        FpduKind::Traffic => Err(HeaderSizeError::NonDeterministic),
    }
}
