//! Per-context statistics.
//!
//! Kept as fields on each sender/receiver context rather than process-wide
//! globals, so a snapshot can be taken per frag_id independently (see
//! SPEC_FULL.md's supplemented features). Backed by
//! [`rle_util::counter::AtomicCounter`], the default and only counter
//! implementation this crate instantiates.

use rle_util::counter::{AtomicCounter, Counter};

#[derive(Debug, Default)]
pub struct Stats {
    sdus_in: AtomicCounter,
    sdus_dropped: AtomicCounter,
    alpdu_bytes_in: AtomicCounter,
    ppdus_out: AtomicCounter,
    ppdu_bytes_out: AtomicCounter,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            sdus_in: AtomicCounter::new(),
            sdus_dropped: AtomicCounter::new(),
            alpdu_bytes_in: AtomicCounter::new(),
            ppdus_out: AtomicCounter::new(),
            ppdu_bytes_out: AtomicCounter::new(),
        }
    }

    pub(crate) fn record_sdu_in(&self, alpdu_len: usize) {
        self.sdus_in.record(1);
        self.alpdu_bytes_in.record(alpdu_len as u64);
    }

    pub(crate) fn record_sdu_dropped(&self) {
        self.sdus_dropped.record(1);
    }

    pub(crate) fn record_ppdu_out(&self, ppdu_len: usize) {
        self.ppdus_out.record(1);
        self.ppdu_bytes_out.record(ppdu_len as u64);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sdus_in: self.sdus_in.get(),
            sdus_dropped: self.sdus_dropped.get(),
            alpdu_bytes_in: self.alpdu_bytes_in.get(),
            ppdus_out: self.ppdus_out.get(),
            ppdu_bytes_out: self.ppdu_bytes_out.get(),
        }
    }
}

/// An immutable, point-in-time read of a context's [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub sdus_in: u64,
    pub sdus_dropped: u64,
    pub alpdu_bytes_in: u64,
    pub ppdus_out: u64,
    pub ppdu_bytes_out: u64,
}

/// Receiver-side counterpart of [`Stats`]: the per-context statistics kept
/// by a reassembly context rather than a sender context.
#[derive(Debug, Default)]
pub struct RxStats {
    ppdus_in: AtomicCounter,
    ppdu_bytes_in: AtomicCounter,
    sdus_delivered: AtomicCounter,
    sdus_dropped: AtomicCounter,
    restarts: AtomicCounter,
    reassembly_errors: AtomicCounter,
}

impl RxStats {
    pub const fn new() -> Self {
        Self {
            ppdus_in: AtomicCounter::new(),
            ppdu_bytes_in: AtomicCounter::new(),
            sdus_delivered: AtomicCounter::new(),
            sdus_dropped: AtomicCounter::new(),
            restarts: AtomicCounter::new(),
            reassembly_errors: AtomicCounter::new(),
        }
    }

    pub(crate) fn record_ppdu_in(&self, ppdu_len: usize) {
        self.ppdus_in.record(1);
        self.ppdu_bytes_in.record(ppdu_len as u64);
    }

    pub(crate) fn record_delivered(&self) {
        self.sdus_delivered.record(1);
    }

    /// Recorded when a PPDU destined for this context had to be dropped
    /// because the caller's SDU output slots were already exhausted.
    pub(crate) fn record_dropped(&self) {
        self.sdus_dropped.record(1);
    }

    pub(crate) fn record_restart(&self) {
        self.restarts.record(1);
    }

    pub(crate) fn record_reassembly_error(&self) {
        self.reassembly_errors.record(1);
    }

    pub fn snapshot(&self) -> RxStatsSnapshot {
        RxStatsSnapshot {
            ppdus_in: self.ppdus_in.get(),
            ppdu_bytes_in: self.ppdu_bytes_in.get(),
            sdus_delivered: self.sdus_delivered.get(),
            sdus_dropped: self.sdus_dropped.get(),
            restarts: self.restarts.get(),
            reassembly_errors: self.reassembly_errors.get(),
        }
    }
}

/// An immutable, point-in-time read of a context's [`RxStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxStatsSnapshot {
    pub ppdus_in: u64,
    pub ppdu_bytes_in: u64,
    pub sdus_delivered: u64,
    pub sdus_dropped: u64,
    pub restarts: u64,
    pub reassembly_errors: u64,
}
