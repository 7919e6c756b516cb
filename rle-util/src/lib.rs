//! Generic utilities the `rle` crate depends upon but which are not
//! themselves part of the Return Link Encapsulation protocol.
//!
//! The main purpose of this crate is to keep `rle` self-contained: logging,
//! the byte-buffer allocator, and statistics counters are all collaborators
//! injected from here rather than hard-wired into the protocol core.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod counter;
pub mod log;

/// Re-exports of the allocator API used to hand the core its byte buffers.
///
/// `rle` contexts allocate their fragmentation/reassembly regions through an
/// [`allocator::Allocator`] rather than assuming a global allocator is
/// available, so the same core builds for a kernel module, an embedded
/// target with a static arena, or a hosted process using [`std`]'s global
/// allocator.
pub mod allocator {
    pub use allocator_api2::alloc::{AllocError, Allocator, Layout};
    #[cfg(feature = "std")]
    pub use allocator_api2::alloc::Global;
    pub use allocator_api2::boxed::Box;
    pub use allocator_api2::vec::Vec;
}

/// A generic error, used internally where a richer enum would be overkill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error;

/// A type alias for `Result<T, rle_util::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
