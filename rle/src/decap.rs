//! Decapsulation: parse an FPDU, route PPDU fragments by frag_id through
//! reassembly contexts, validate protection, recover SDUs.

use rle_util::allocator::{Allocator, Vec};
use rle_util::log::warn;

use crate::config::{Config, ProtectionMode};
use crate::crc::Crc32;
use crate::encap::{decode_ptype_complete, decode_ptype_fragmented};
use crate::error::{DecapError, ReassemblyError};
use crate::header::{is_padding_marker, parse_header, LabelType, PpduKind};
use crate::receiver::{Receiver, ReceiverContext, ReceiverState};
use crate::sdu::Sdu;
use crate::trailer::{read_seqno, verify};

/// Parses `fpdu`, routing each PPDU it contains to the matching frag_id
/// context and writing completed SDUs into `sdus_out` in arrival order.
///
/// Returns the number of SDUs delivered on success. `payload_label_out`, if
/// present, must have length 0, 3 or 6; its bytes are filled from the front
/// of `fpdu`. A `Some` slice with a size outside that set is
/// `InvalidLabel`; there is no separate size parameter, slice length is
/// authoritative.
pub fn decapsulate<A: Allocator + Clone, C: Crc32>(
    rx: &mut Receiver<A, C>,
    fpdu: &[u8],
    sdus_out: &mut [Option<Sdu<A>>],
    payload_label_out: Option<&mut [u8]>,
) -> Result<usize, DecapError> {
    if fpdu.is_empty() {
        return Err(DecapError::InvalidFpdu);
    }
    if sdus_out.is_empty() {
        return Err(DecapError::InvalidSdus);
    }
    let label_len = payload_label_out.as_ref().map_or(0, |buf| buf.len());
    if label_len != 0 && label_len != 3 && label_len != 6 {
        return Err(DecapError::InvalidLabel);
    }
    if fpdu.len() < label_len {
        return Err(DecapError::InvalidFpdu);
    }
    if let Some(buf) = payload_label_out {
        buf.copy_from_slice(&fpdu[..label_len]);
    }

    let mut offset = label_len;
    let mut delivered = 0usize;
    let mut any_reassembly_error = false;

    while fpdu.len() - offset >= 2 {
        let rest = &fpdu[offset..];
        if is_padding_marker(rest) {
            break;
        }

        let (kind, header_len) = match parse_header(rest) {
            Ok(parsed) => parsed,
            Err(_) => return Err(DecapError::Malformed { delivered }),
        };
        let ppdu_len = header_len + kind.length() as usize;
        if ppdu_len > rest.len() {
            return Err(DecapError::Malformed { delivered });
        }
        if delivered == sdus_out.len() {
            if let Some(frag_id) = kind.frag_id() {
                rx.contexts[frag_id as usize].stats.record_dropped();
            }
            return Err(DecapError::SomeDrop { delivered });
        }

        let payload = &rest[header_len..ppdu_len];
        match dispatch_fragment(rx, kind, payload) {
            Ok(Some(sdu)) => {
                sdus_out[delivered] = Some(sdu);
                delivered += 1;
            }
            Ok(None) => {}
            Err(_) => any_reassembly_error = true,
        }
        offset += ppdu_len;
    }

    if fpdu[offset..].iter().any(|&b| b != 0) {
        warn!("FPDU padding contains a non-zero byte");
    }

    if any_reassembly_error {
        Err(DecapError::ReassemblyError { delivered })
    } else {
        Ok(delivered)
    }
}

/// Routes one already-length-checked PPDU payload to its reassembly
/// context, returning a completed SDU when this fragment was the one that
/// finished an ALPDU.
fn dispatch_fragment<A: Allocator + Clone, C: Crc32>(
    rx: &mut Receiver<A, C>,
    kind: PpduKind,
    payload: &[u8],
) -> Result<Option<Sdu<A>>, ReassemblyError> {
    match kind {
        PpduKind::Complete { label_type, .. } => {
            let idx = rx.first_free().ok_or(ReassemblyError::NoFreeContext)?;
            let ctx = &mut rx.contexts[idx];
            ctx.stats.record_ppdu_in(payload.len());
            ctx.protection = rx.config.protection();
            ctx.buffer.arm(payload.len());
            ctx.buffer.put(payload)?;
            let result = finalize(ctx, &rx.config, &rx.crc, PtypeSource::Complete(label_type));
            ctx.buffer.reset();
            ctx.state = ReceiverState::Idle;
            result.map(Some)
        }
        PpduKind::Start { frag_id, total_length, use_crc, .. } => {
            let ctx = &mut rx.contexts[frag_id as usize];
            ctx.stats.record_ppdu_in(payload.len());
            if ctx.state == ReceiverState::Armed {
                warn!("discarding in-flight ALPDU for frag_id {}, new START arrived", frag_id);
                ctx.stats.record_restart();
            }
            ctx.protection = if use_crc { ProtectionMode::Crc } else { ProtectionMode::SeqNo };
            ctx.buffer.arm(total_length as usize);
            if let Err(e) = ctx.buffer.put(payload) {
                ctx.state = ReceiverState::Idle;
                ctx.buffer.reset();
                ctx.stats.record_reassembly_error();
                return Err(e);
            }
            ctx.state = ReceiverState::Armed;
            Ok(None)
        }
        PpduKind::Cont { frag_id, .. } => extend(rx, frag_id, payload, false),
        PpduKind::End { frag_id, .. } => extend(rx, frag_id, payload, true),
    }
}

/// Shared CONT/END handling: append `payload`, and on `is_end` validate
/// and publish the reassembled SDU.
fn extend<A: Allocator + Clone, C: Crc32>(
    rx: &mut Receiver<A, C>,
    frag_id: u8,
    payload: &[u8],
    is_end: bool,
) -> Result<Option<Sdu<A>>, ReassemblyError> {
    let ctx = &mut rx.contexts[frag_id as usize];
    ctx.stats.record_ppdu_in(payload.len());
    if ctx.state != ReceiverState::Armed {
        ctx.stats.record_reassembly_error();
        return Err(ReassemblyError::OutOfOrder);
    }
    if let Err(e) = ctx.buffer.put(payload) {
        ctx.state = ReceiverState::Idle;
        ctx.buffer.reset();
        ctx.stats.record_reassembly_error();
        return Err(e);
    }
    if !is_end {
        return Ok(None);
    }
    if !ctx.buffer.is_complete() {
        ctx.state = ReceiverState::Idle;
        ctx.buffer.reset();
        ctx.stats.record_reassembly_error();
        return Err(ReassemblyError::LengthMismatch);
    }
    let result = finalize(ctx, &rx.config, &rx.crc, PtypeSource::Fragmented);
    ctx.buffer.reset();
    ctx.state = ReceiverState::Idle;
    if result.is_err() {
        ctx.stats.record_reassembly_error();
    }
    result.map(Some)
}

/// Where a reassembled ALPDU's protocol-type framing comes from: a
/// COMPLETE PPDU carries it explicitly via LT_T_FID, while a fragmented one
/// has no such bit and derives it from [`Config`] alone (see
/// [`decode_ptype_fragmented`]).
enum PtypeSource {
    Complete(LabelType),
    Fragmented,
}

/// Splits a fully-reassembled ALPDU body into its protocol-type header,
/// SDU, and trailer; validates the trailer; publishes an owned [`Sdu`] on
/// success.
fn finalize<A: Allocator + Clone, C: Crc32>(
    ctx: &mut ReceiverContext<A>,
    cfg: &Config,
    crc: &C,
    source: PtypeSource,
) -> Result<Sdu<A>, ReassemblyError> {
    let body = ctx.buffer.reassembled();
    let (ptype, ptype_len) = match source {
        PtypeSource::Complete(label_type) => decode_ptype_complete(cfg, label_type, body)?,
        PtypeSource::Fragmented => decode_ptype_fragmented(cfg, body)?,
    };

    let trailer_len = ctx.protection.trailer_len();
    if body.len() < ptype_len + trailer_len {
        return Err(ReassemblyError::LengthMismatch);
    }
    let sdu_bytes = &body[ptype_len..body.len() - trailer_len];
    let trailer_bytes = &body[body.len() - trailer_len..];

    let expected_seqno = match ctx.protection {
        ProtectionMode::SeqNo => Some(ctx.next_seq),
        ProtectionMode::Crc => None,
    };
    if !verify(ctx.protection, trailer_bytes, crc, ptype.0, sdu_bytes, expected_seqno) {
        return Err(ReassemblyError::ProtectionFailed);
    }
    if ctx.protection == ProtectionMode::SeqNo {
        ctx.next_seq = read_seqno(trailer_bytes).wrapping_add(1);
    }

    let mut bytes = Vec::with_capacity_in(sdu_bytes.len(), ctx.buffer.allocator().clone());
    bytes.extend_from_slice(sdu_bytes);
    ctx.stats.record_delivered();
    Ok(Sdu { protocol_type: ptype, bytes })
}
