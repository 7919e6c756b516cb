//! Encapsulation: SDU -> sealed ALPDU.

use rle_util::allocator::Allocator;

use crate::crc::Crc32;
use crate::error::EncapError;
use crate::header::LabelType;
use crate::sdu::{ProtocolType, SduRef, ALPDU_MAX_LEN, SDU_MAX_LEN};
use crate::trailer::{compute_alpdu_crc, write_crc, write_seqno};
use crate::transmitter::{SenderState, Transmitter};

/// How the protocol type ends up represented at the front of the ALPDU.
pub(crate) enum PtypeEncoding {
    /// No bytes written; label type communicates this on a COMPLETE PPDU.
    Omitted { label_type: LabelType },
    Compressed { code: u8 },
    Uncompressed { ptype: u16 },
}

impl PtypeEncoding {
    fn len(&self) -> usize {
        match self {
            Self::Omitted { .. } => 0,
            Self::Compressed { .. } => 1,
            Self::Uncompressed { .. } => 2,
        }
    }

    fn write(&self, out: &mut [u8]) {
        match self {
            Self::Omitted { .. } => {}
            Self::Compressed { code } => out[0] = *code,
            Self::Uncompressed { ptype } => out[..2].copy_from_slice(&ptype.to_be_bytes()),
        }
    }

    /// Label type to use if this ALPDU is ultimately sent as a single
    /// COMPLETE PPDU (meaningless, but harmless, for fragmented sends).
    fn label_type(&self) -> LabelType {
        match self {
            Self::Omitted { label_type } => *label_type,
            _ => LabelType::Legacy,
        }
    }
}

/// Decides how `sdu.protocol_type` will be represented: omitted when the
/// config allows it and the SDU matches the implicit inference rule, else
/// compressed, else the full 2-byte ethertype.
pub(crate) fn choose_ptype_encoding<A: Allocator + Clone, C: Crc32>(
    tx: &Transmitter<A, C>,
    sdu: &SduRef<'_>,
) -> PtypeEncoding {
    let cfg = &tx.config;
    if cfg.ptype_is_omissible(sdu.protocol_type, sdu.bytes) {
        let label_type = if sdu.protocol_type == ProtocolType::SIGNALING {
            LabelType::Signaling
        } else {
            LabelType::ImplicitPtypeOmitted
        };
        return PtypeEncoding::Omitted { label_type };
    }
    if cfg.use_compressed_ptype {
        if let Some(code) = crate::sdu::compress_ptype(sdu.protocol_type) {
            return PtypeEncoding::Compressed { code };
        }
    }
    PtypeEncoding::Uncompressed { ptype: sdu.protocol_type.0 }
}

/// Builds and seals an ALPDU for `frag_id`, ready for
/// [`crate::frag::fragment`] to drain.
pub fn encapsulate<A: Allocator + Clone, C: Crc32>(
    tx: &mut Transmitter<A, C>,
    frag_id: u8,
    sdu: SduRef<'_>,
) -> Result<(), EncapError> {
    if sdu.bytes.len() > SDU_MAX_LEN {
        return Err(EncapError::SduTooBig);
    }
    if tx.contexts[frag_id as usize].state != SenderState::Idle {
        return Err(EncapError::ContextBusy);
    }

    let ptype_encoding = choose_ptype_encoding(tx, &sdu);
    let protection = tx.config.protection();
    let ptype_len = ptype_encoding.len();
    let total_len = ptype_len + sdu.bytes.len() + protection.trailer_len();
    debug_assert!(total_len <= ALPDU_MAX_LEN);

    let mut alpdu = [0u8; ALPDU_MAX_LEN];
    ptype_encoding.write(&mut alpdu[..ptype_len]);
    alpdu[ptype_len..ptype_len + sdu.bytes.len()].copy_from_slice(sdu.bytes);

    match protection {
        crate::config::ProtectionMode::Crc => {
            let crc = compute_alpdu_crc(&tx.crc, sdu.protocol_type.0, sdu.bytes);
            write_crc(&mut alpdu[ptype_len + sdu.bytes.len()..total_len], crc);
        }
        crate::config::ProtectionMode::SeqNo => {
            let seqno = tx.contexts[frag_id as usize].next_seq;
            write_seqno(&mut alpdu[ptype_len + sdu.bytes.len()..total_len], seqno);
            tx.contexts[frag_id as usize].next_seq = seqno.wrapping_add(1);
        }
    }

    let label_type = ptype_encoding.label_type();
    let ctx = &mut tx.contexts[frag_id as usize];
    ctx.buffer.fill(&alpdu[..total_len]);
    ctx.protection = protection;
    ctx.label_type = label_type;
    ctx.state = SenderState::Filled;
    ctx.stats.record_sdu_in(total_len);
    Ok(())
}

/// Recovers the protocol type the [`config::Config::implicit_protocol_type`]
/// inference rule would have picked at the sender, given the reassembled
/// ALPDU body with its protocol-type header omitted.
fn infer_implicit_ptype(cfg: &crate::config::Config, body: &[u8]) -> Result<ProtocolType, crate::error::ReassemblyError> {
    use crate::error::ReassemblyError;
    use crate::sdu::{PTYPE_COMPRESSED_IP, PTYPE_COMPRESSED_VLAN};

    match cfg.implicit_protocol_type {
        PTYPE_COMPRESSED_IP => match body.first().map(|b| b >> 4) {
            Some(4) => Ok(ProtocolType::IPV4),
            Some(6) => Ok(ProtocolType::IPV6),
            _ => Err(ReassemblyError::UnknownProtocolType),
        },
        PTYPE_COMPRESSED_VLAN => Ok(ProtocolType::VLAN),
        code => crate::sdu::decompress_ptype(code).map(ProtocolType).ok_or(ReassemblyError::UnknownProtocolType),
    }
}

/// Decodes the protocol type and header length at the front of a
/// reassembled COMPLETE PPDU body, given the explicit `label_type` carried
/// by its LT_T_FID field.
pub(crate) fn decode_ptype_complete(
    cfg: &crate::config::Config,
    label_type: LabelType,
    body: &[u8],
) -> Result<(ProtocolType, usize), crate::error::ReassemblyError> {
    use crate::error::ReassemblyError;

    match label_type {
        LabelType::Signaling => Ok((ProtocolType::SIGNALING, 0)),
        LabelType::ImplicitPtypeOmitted => Ok((infer_implicit_ptype(cfg, body)?, 0)),
        LabelType::Reserved => Err(ReassemblyError::UnknownProtocolType),
        LabelType::Legacy => {
            let header_len = if cfg.use_compressed_ptype { 1 } else { 2 };
            if body.len() < header_len {
                return Err(ReassemblyError::LengthMismatch);
            }
            let ptype = if cfg.use_compressed_ptype {
                crate::sdu::decompress_ptype(body[0]).ok_or(ReassemblyError::UnknownProtocolType)?
            } else {
                u16::from_be_bytes([body[0], body[1]])
            };
            Ok((ProtocolType(ptype), header_len))
        }
    }
}

/// Decodes the protocol type and header length at the front of a
/// reassembled fragmented (START/CONT/END) ALPDU body. Non-COMPLETE PPDUs
/// have no LT_T_FID label-type bit, so the header's presence and size are
/// derived purely from `cfg` (see DESIGN.md for this open-question
/// resolution): `allow_ptype_omission` is treated as applying to every
/// ALPDU sent under this config, never falling back to an explicit header
/// mid-channel.
pub(crate) fn decode_ptype_fragmented(
    cfg: &crate::config::Config,
    body: &[u8],
) -> Result<(ProtocolType, usize), crate::error::ReassemblyError> {
    use crate::error::ReassemblyError;

    if cfg.allow_ptype_omission {
        return Ok((infer_implicit_ptype(cfg, body)?, 0));
    }
    let header_len = if cfg.use_compressed_ptype { 1 } else { 2 };
    if body.len() < header_len {
        return Err(ReassemblyError::LengthMismatch);
    }
    let ptype = if cfg.use_compressed_ptype {
        crate::sdu::decompress_ptype(body[0]).ok_or(ReassemblyError::UnknownProtocolType)?
    } else {
        u16::from_be_bytes([body[0], body[1]])
    };
    Ok((ProtocolType(ptype), header_len))
}
