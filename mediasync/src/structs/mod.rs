//! Data structures representing framing-format components.
//!
//! Contains decoded representations of the bit-packed headers handled by
//! the crate: ADTS fixed headers, RTP fixed headers, and the MPEG-TS
//! packet grid.

pub mod adts;
pub mod mpegts;
pub mod rtp;
