//! The "monotonic counter" collaborator named by the RLE core: a place to
//! accumulate byte/packet/drop statistics without the core depending on any
//! particular stats backend.

use core::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter the core uses to accumulate statistics.
///
/// Implementations are free to back this with an atomic, a per-context plain
/// integer (if the embedder already serializes access), or a bridge into an
/// external metrics system. The core never reads a counter back through this
/// trait; readback happens through the snapshot types in `rle::stats`.
pub trait Counter {
    fn record(&self, delta: u64);
}

/// Lock-free default counter backed by [`AtomicU64`].
#[derive(Debug, Default)]
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Counter for AtomicCounter {
    fn record(&self, delta: u64) {
        self.0.fetch_add(delta, Ordering::Relaxed);
    }
}
