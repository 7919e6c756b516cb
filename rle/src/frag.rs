//! Fragmentation: drains a sealed ALPDU into successive PPDUs that fit a
//! caller-chosen burst size.

use rle_util::allocator::Allocator;

use crate::config::ProtectionMode;
use crate::crc::Crc32;
use crate::error::FragmentError;
use crate::header::{write_header, PpduKind, BASE_HEADER_LEN, MAX_PPDU_PAYLOAD_LEN, START_CONTINUATION_LEN};
use crate::transmitter::{SenderState, Transmitter};

/// Emits the next PPDU for `frag_id` into `out`, draining at most
/// `burst_size` bytes of the sealed ALPDU. Returns the number of bytes
/// written to `out`.
pub fn fragment<A: Allocator + Clone, C: Crc32>(
    tx: &mut Transmitter<A, C>,
    frag_id: u8,
    burst_size: usize,
    out: &mut [u8],
) -> Result<usize, FragmentError> {
    let ctx = &mut tx.contexts[frag_id as usize];
    if ctx.state == SenderState::Idle {
        return Err(FragmentError::ContextIsNull);
    }
    if burst_size < BASE_HEADER_LEN + 1 {
        return Err(FragmentError::BurstTooSmall);
    }

    let remaining = ctx.buffer.remaining();
    let is_first = ctx.buffer.is_first_emission();
    let final_max_payload = (burst_size - BASE_HEADER_LEN).min(MAX_PPDU_PAYLOAD_LEN as usize);
    let fits_as_final = remaining <= final_max_payload;

    let (kind, header_len, length) = if fits_as_final {
        let length = remaining as u16;
        let kind = if is_first {
            PpduKind::Complete { label_type: ctx.label_type, length }
        } else {
            PpduKind::End { frag_id, length }
        };
        (kind, BASE_HEADER_LEN, remaining)
    } else {
        let header_len = if is_first { BASE_HEADER_LEN + START_CONTINUATION_LEN } else { BASE_HEADER_LEN };
        if burst_size <= header_len {
            return Err(FragmentError::BurstTooSmall);
        }
        let max_payload = (burst_size - header_len).min(MAX_PPDU_PAYLOAD_LEN as usize);
        let length = max_payload;
        let new_remaining = remaining - length;
        if ctx.protection == ProtectionMode::Crc
            && new_remaining > 0
            && new_remaining < ProtectionMode::Crc.trailer_len()
        {
            return Err(FragmentError::InvalidSize);
        }
        let kind = if is_first {
            PpduKind::Start {
                frag_id,
                length: length as u16,
                total_length: ctx.buffer.total_len() as u16,
                use_crc: ctx.protection == ProtectionMode::Crc,
            }
        } else {
            PpduKind::Cont { frag_id, length: length as u16 }
        };
        (kind, header_len, length)
    };

    let total_out = header_len + length;
    if out.len() < total_out {
        return Err(FragmentError::OutputTooSmall);
    }

    write_header(&mut out[..header_len], kind);
    out[header_len..total_out].copy_from_slice(ctx.buffer.peek(length));
    ctx.buffer.advance(length);
    ctx.stats.record_ppdu_out(total_out);

    ctx.state = match kind {
        PpduKind::Complete { .. } | PpduKind::End { .. } => {
            ctx.buffer.reset();
            SenderState::Idle
        }
        PpduKind::Start { .. } | PpduKind::Cont { .. } => SenderState::Draining,
    };

    Ok(total_out)
}
