//! Packing: concatenate PPDUs with an optional payload label into an FPDU,
//! zero-padded.
//!
//! The caller threads `cursor`/`remaining` across repeated [`pack`] calls
//! for one FPDU, and `cursor + remaining` must always equal the FPDU's
//! total capacity.

use crate::error::PackError;

fn check_label(label: Option<&[u8]>) -> Result<usize, PackError> {
    let len = label.map_or(0, <[u8]>::len);
    if len != 0 && len != 3 && len != 6 {
        return Err(PackError::InvalidLabel);
    }
    Ok(len)
}

/// Copies `label` into the (empty) front of `fpdu` with no PPDU, for
/// callers that want the label written before the first [`pack`] call.
pub fn pack_init(
    label: Option<&[u8]>,
    fpdu: &mut [u8],
    cursor: &mut usize,
    remaining: &mut usize,
) -> Result<(), PackError> {
    let label_len = check_label(label)?;
    if *cursor != 0 {
        return Err(PackError::FpduTooSmall);
    }
    if *remaining < label_len {
        return Err(PackError::FpduTooSmall);
    }
    if let Some(label) = label {
        fpdu[*cursor..*cursor + label_len].copy_from_slice(label);
    }
    *cursor += label_len;
    *remaining -= label_len;
    Ok(())
}

/// Appends one PPDU to `fpdu`, prefixing it with `label` first if this is
/// the FPDU's first PPDU (`*cursor == 0`).
pub fn pack(
    ppdu: &[u8],
    label: Option<&[u8]>,
    fpdu: &mut [u8],
    cursor: &mut usize,
    remaining: &mut usize,
) -> Result<(), PackError> {
    if ppdu.is_empty() {
        return Err(PackError::InvalidPpdu);
    }
    let label_len = check_label(label)?;

    let needed = if *cursor == 0 { label_len + ppdu.len() } else { ppdu.len() };
    if *remaining < needed {
        return Err(PackError::FpduTooSmall);
    }

    if *cursor == 0 && label_len > 0 {
        fpdu[*cursor..*cursor + label_len].copy_from_slice(label.expect("label_len > 0 implies Some"));
        *cursor += label_len;
        *remaining -= label_len;
    }

    fpdu[*cursor..*cursor + ppdu.len()].copy_from_slice(ppdu);
    *cursor += ppdu.len();
    *remaining -= ppdu.len();
    Ok(())
}

/// Zero-fills the unused tail of `fpdu`, from `cursor` to `cursor +
/// remaining`. Idempotent: bytes before `cursor` are untouched.
pub fn pad(fpdu: &mut [u8], cursor: usize, remaining: usize) {
    if remaining != 0 {
        fpdu[cursor..cursor + remaining].fill(0);
    }
}
