//! The sender-side per-context ALPDU buffer.
//!
//! Three cursors over one allocator-backed region: `alpdu_start` (always 0,
//! kept for parity with the reassembly side and in case a future revision
//! reuses the tail of a region), `alpdu_end` (total sealed ALPDU length),
//! and `next_to_emit` (how much has already left the context via
//! [`crate::frag::fragment`]).

use rle_util::allocator::{Allocator, Vec};

use crate::sdu::ALPDU_MAX_LEN;

pub struct FragmentationBuffer<A: Allocator> {
    bytes: Vec<u8, A>,
    alpdu_start: usize,
    alpdu_end: usize,
    next_to_emit: usize,
}

impl<A: Allocator> FragmentationBuffer<A> {
    pub fn new_in(alloc: A) -> Self {
        Self { bytes: Vec::with_capacity_in(ALPDU_MAX_LEN, alloc), alpdu_start: 0, alpdu_end: 0, next_to_emit: 0 }
    }

    /// Seals a freshly-built ALPDU into the buffer, ready to be drained by
    /// repeated [`Self::take`] calls.
    pub(crate) fn fill(&mut self, alpdu: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(alpdu);
        self.alpdu_start = 0;
        self.alpdu_end = alpdu.len();
        self.next_to_emit = 0;
    }

    pub(crate) fn remaining(&self) -> usize {
        self.alpdu_end - self.next_to_emit
    }

    pub(crate) fn total_len(&self) -> usize {
        self.alpdu_end - self.alpdu_start
    }

    pub(crate) fn is_first_emission(&self) -> bool {
        self.next_to_emit == self.alpdu_start
    }

    /// Returns the next `len` unsent bytes without advancing the cursor.
    pub(crate) fn peek(&self, len: usize) -> &[u8] {
        &self.bytes[self.next_to_emit..self.next_to_emit + len]
    }

    pub(crate) fn advance(&mut self, len: usize) {
        self.next_to_emit += len;
    }

    pub(crate) fn reset(&mut self) {
        self.alpdu_start = 0;
        self.alpdu_end = 0;
        self.next_to_emit = 0;
        self.bytes.clear();
    }
}
