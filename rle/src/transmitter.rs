//! The sender side: eight frag_id contexts behind one [`Config`], plus the
//! collaborators named by the spec (allocator, CRC-32, statistics).

use rle_util::allocator::Allocator;
use rle_util::log::{debug, warn};

use crate::config::{Config, ProtectionMode};
use crate::crc::{Crc32, Ieee8023Crc32};
use crate::frag_buffer::FragmentationBuffer;
use crate::header::LabelType;
use crate::stats::Stats;

pub const FRAG_ID_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SenderState {
    Idle,
    Filled,
    Draining,
}

pub(crate) struct SenderContext<A: Allocator> {
    pub(crate) state: SenderState,
    pub(crate) buffer: FragmentationBuffer<A>,
    pub(crate) protection: ProtectionMode,
    /// Label type to surface on LT_T_FID if this ALPDU ends up sent as one
    /// COMPLETE PPDU; decided once at encapsulation time.
    pub(crate) label_type: LabelType,
    pub(crate) next_seq: u8,
    pub(crate) stats: Stats,
}

impl<A: Allocator + Clone> SenderContext<A> {
    fn new_in(alloc: A) -> Self {
        Self {
            state: SenderState::Idle,
            buffer: FragmentationBuffer::new_in(alloc),
            protection: ProtectionMode::Crc,
            label_type: LabelType::Legacy,
            next_seq: 0,
            stats: Stats::new(),
        }
    }
}

/// Owns the eight per-frag_id sender contexts for one RLE channel.
pub struct Transmitter<A: Allocator + Clone, C: Crc32 = Ieee8023Crc32> {
    pub(crate) config: Config,
    pub(crate) contexts: [SenderContext<A>; FRAG_ID_COUNT],
    pub(crate) crc: C,
}

impl<A: Allocator + Clone> Transmitter<A, Ieee8023Crc32> {
    pub fn new_in(config: Config, alloc: A) -> Result<Self, crate::error::ConfigError> {
        Self::with_crc_in(config, alloc, Ieee8023Crc32)
    }
}

impl<A: Allocator + Clone, C: Crc32> Transmitter<A, C> {
    pub fn with_crc_in(config: Config, alloc: A, crc: C) -> Result<Self, crate::error::ConfigError> {
        config.check()?;
        let contexts = core::array::from_fn(|_| SenderContext::new_in(alloc.clone()));
        Ok(Self { config, contexts, crc })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self, frag_id: u8) -> Option<crate::stats::StatsSnapshot> {
        self.contexts.get(frag_id as usize).map(|ctx| ctx.stats.snapshot())
    }

    /// Total size of the ALPDU currently queued for `frag_id`, or `None` if
    /// the context is idle or `frag_id` is out of range.
    pub fn queue_size(&self, frag_id: u8) -> Option<usize> {
        let ctx = self.contexts.get(frag_id as usize)?;
        (ctx.state != SenderState::Idle).then(|| ctx.buffer.total_len())
    }

    /// `true` if `frag_id`'s context holds no ALPDU in flight.
    pub fn queue_state_is_empty(&self, frag_id: u8) -> Option<bool> {
        self.contexts.get(frag_id as usize).map(|ctx| ctx.state == SenderState::Idle)
    }

    /// Bytes of the queued ALPDU not yet drained by [`crate::frag::fragment`].
    pub fn remaining_alpdu_length(&self, frag_id: u8) -> Option<usize> {
        let ctx = self.contexts.get(frag_id as usize)?;
        (ctx.state != SenderState::Idle).then(|| ctx.buffer.remaining())
    }

    /// Post-condition check: `true` iff `frag_id`'s context has drained its
    /// whole queued ALPDU as a consistent S..E sequence and is back to
    /// idle. Also `true` for a context that was never filled.
    pub fn check_frag_integrity(&self, frag_id: u8) -> Option<bool> {
        let ctx = self.contexts.get(frag_id as usize)?;
        Some(ctx.state == SenderState::Idle && ctx.buffer.remaining() == 0)
    }

    /// Discards whatever ALPDU is in flight for `frag_id`, logging a
    /// warning if anything was actually dropped.
    pub fn flush(&mut self, frag_id: u8) {
        if let Some(ctx) = self.contexts.get_mut(frag_id as usize) {
            if ctx.state != SenderState::Idle {
                warn!("flushing sender context {} with an ALPDU in flight", frag_id);
                ctx.stats.record_sdu_dropped();
            }
            ctx.state = SenderState::Idle;
            ctx.buffer.reset();
        }
    }

    /// Logs this context's state at `debug!` level; diagnostic only.
    pub fn dump_context(&self, frag_id: u8) {
        if let Some(ctx) = self.contexts.get(frag_id as usize) {
            debug!(
                "tx frag_id={} state={:?} protection={:?} next_seq={} buffered={}",
                frag_id,
                ctx.state,
                ctx.protection,
                ctx.next_seq,
                ctx.buffer.remaining(),
            );
        }
    }
}
