//! The receiver-side per-context reassembly buffer.
//!
//! Fragments are appended strictly in arrival order (no reordering window),
//! growing `sdu_frag_end` towards the `sdu_end` declared by the START
//! fragment's `total_length`.

use rle_util::allocator::{Allocator, Vec};

use crate::error::ReassemblyError;
use crate::sdu::ALPDU_MAX_LEN;

pub struct ReassemblyBuffer<A: Allocator> {
    bytes: Vec<u8, A>,
    sdu_start: usize,
    sdu_end: usize,
    sdu_frag_end: usize,
}

impl<A: Allocator> ReassemblyBuffer<A> {
    pub fn new_in(alloc: A) -> Self {
        Self { bytes: Vec::with_capacity_in(ALPDU_MAX_LEN, alloc), sdu_start: 0, sdu_end: 0, sdu_frag_end: 0 }
    }

    /// Arms the buffer for a new ALPDU of `total_length` bytes.
    pub(crate) fn arm(&mut self, total_length: usize) {
        self.bytes.clear();
        self.bytes.resize(total_length, 0);
        self.sdu_start = 0;
        self.sdu_end = total_length;
        self.sdu_frag_end = 0;
    }

    pub(crate) fn put(&mut self, fragment: &[u8]) -> Result<(), ReassemblyError> {
        if self.sdu_frag_end + fragment.len() > self.sdu_end {
            return Err(ReassemblyError::Overflow);
        }
        self.bytes[self.sdu_frag_end..self.sdu_frag_end + fragment.len()].copy_from_slice(fragment);
        self.sdu_frag_end += fragment.len();
        Ok(())
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.sdu_frag_end == self.sdu_end
    }

    pub(crate) fn reassembled(&self) -> &[u8] {
        &self.bytes[self.sdu_start..self.sdu_frag_end]
    }

    pub(crate) fn allocator(&self) -> &A {
        self.bytes.allocator()
    }

    pub(crate) fn reset(&mut self) {
        self.sdu_start = 0;
        self.sdu_end = 0;
        self.sdu_frag_end = 0;
        self.bytes.clear();
    }
}
