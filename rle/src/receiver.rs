//! The receiver side: eight frag_id reassembly contexts behind one
//! [`Config`], mirroring [`crate::transmitter::Transmitter`].

use rle_util::allocator::Allocator;
use rle_util::log::{debug, warn};

use crate::config::{Config, ProtectionMode};
use crate::crc::{Crc32, Ieee8023Crc32};
use crate::reasm_buffer::ReassemblyBuffer;
use crate::stats::RxStats;
use crate::transmitter::FRAG_ID_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReceiverState {
    Idle,
    Armed,
}

pub(crate) struct ReceiverContext<A: Allocator> {
    pub(crate) state: ReceiverState,
    pub(crate) buffer: ReassemblyBuffer<A>,
    pub(crate) protection: ProtectionMode,
    /// Persists across ALPDUs for this frag_id: the next expected SeqNo is
    /// always last-received-plus-one mod 256.
    pub(crate) next_seq: u8,
    pub(crate) stats: RxStats,
}

impl<A: Allocator + Clone> ReceiverContext<A> {
    fn new_in(alloc: A) -> Self {
        Self {
            state: ReceiverState::Idle,
            buffer: ReassemblyBuffer::new_in(alloc),
            protection: ProtectionMode::Crc,
            next_seq: 0,
            stats: RxStats::new(),
        }
    }
}

/// Owns the eight per-frag_id reassembly contexts for one RLE channel.
pub struct Receiver<A: Allocator + Clone, C: Crc32 = Ieee8023Crc32> {
    pub(crate) config: Config,
    pub(crate) contexts: [ReceiverContext<A>; FRAG_ID_COUNT],
    pub(crate) crc: C,
}

impl<A: Allocator + Clone> Receiver<A, Ieee8023Crc32> {
    pub fn new_in(config: Config, alloc: A) -> Result<Self, crate::error::ConfigError> {
        Self::with_crc_in(config, alloc, Ieee8023Crc32)
    }
}

impl<A: Allocator + Clone, C: Crc32> Receiver<A, C> {
    pub fn with_crc_in(config: Config, alloc: A, crc: C) -> Result<Self, crate::error::ConfigError> {
        config.check()?;
        let contexts = core::array::from_fn(|_| ReceiverContext::new_in(alloc.clone()));
        Ok(Self { config, contexts, crc })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self, frag_id: u8) -> Option<crate::stats::RxStatsSnapshot> {
        self.contexts.get(frag_id as usize).map(|ctx| ctx.stats.snapshot())
    }

    /// Lowest-indexed idle context, for a COMPLETE PPDU's one-shot use. The
    /// whole search is one non-reentrant method on `&self`, so there is no
    /// window in which another call could observe the array mid-search.
    pub(crate) fn first_free(&self) -> Option<usize> {
        self.contexts.iter().position(|ctx| ctx.state == ReceiverState::Idle)
    }

    /// Discards an in-flight reassembly for `frag_id`, logging a warning
    /// if anything was actually in progress.
    pub fn flush(&mut self, frag_id: u8) {
        if let Some(ctx) = self.contexts.get_mut(frag_id as usize) {
            if ctx.state != ReceiverState::Idle {
                warn!("flushing receiver context {} with a reassembly in flight", frag_id);
                ctx.stats.record_reassembly_error();
            }
            ctx.state = ReceiverState::Idle;
            ctx.buffer.reset();
        }
    }

    /// Logs this context's state at `debug!` level; diagnostic only.
    pub fn dump_context(&self, frag_id: u8) {
        if let Some(ctx) = self.contexts.get(frag_id as usize) {
            debug!(
                "rx frag_id={} state={:?} protection={:?} next_seq={}",
                frag_id, ctx.state, ctx.protection, ctx.next_seq,
            );
        }
    }
}
