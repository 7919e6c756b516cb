//! Return Link Encapsulation (RLE) protocol core for DVB-RCS2 satellite
//! return links.
//!
//! Encapsulation and fragmentation live on the transmitter side
//! ([`Transmitter`], [`encap::encapsulate`], [`frag::fragment`]); packing
//! ties fragmented PPDUs into an FPDU ([`pack`]). The receiver side mirrors
//! this with [`Receiver`] and [`decap::decapsulate`]. [`fpdu::header_size`]
//! answers the deterministic-overhead question for the three FPDU kinds
//! that have one.
//!
//! No RLE context ever assumes a global allocator; every byte buffer is
//! drawn from an [`rle_util::allocator::Allocator`] supplied by the caller.

#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod crc;
mod decap;
mod encap;
mod error;
mod fpdu;
mod frag;
mod frag_buffer;
mod header;
mod pack;
mod reasm_buffer;
mod receiver;
mod sdu;
mod stats;
mod trailer;
mod transmitter;

pub use config::{Config, ProtectionMode};
pub use crc::{Crc32, Ieee8023Crc32};
pub use decap::decapsulate;
pub use encap::encapsulate;
pub use error::{
    ConfigError, DecapError, EncapError, FragmentError, HeaderSizeError, PackError, ReassemblyError,
};
pub use fpdu::{header_size, FpduKind};
pub use frag::fragment;
pub use pack::{pack, pack_init, pad};
pub use receiver::Receiver;
pub use sdu::{ProtocolType, Sdu, SduRef, ALPDU_MAX_LEN, SDU_MAX_LEN};
pub use stats::{RxStats, RxStatsSnapshot, Stats, StatsSnapshot};
pub use transmitter::{Transmitter, FRAG_ID_COUNT};
