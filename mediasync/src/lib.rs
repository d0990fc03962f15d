#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Two independent pipelines share the same kernel: byte-stream
//! synchronization plus MSB-first bit-field decoding.
//!
//! ### ADTS
//!
//! File bytes flow through the [`process::extract::AdtsExtractor`], which
//! scans for the 12-bit syncword `0xFFF`, validates the header-declared
//! frame length, and yields whole frames. Misalignment recovery is one byte
//! at a time; a frame split across reads is carried over in the extractor's
//! ring buffer until its tail arrives.
//!
//! ### RTP / MPEG-TS
//!
//! Each UDP datagram decodes through [`structs::rtp::RtpHeader`]; payloads
//! classified as MP2T split into fixed 188-byte packets via
//! [`structs::mpegts::ts_packets`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediasync::process::extract::AdtsExtractor;
//!
//! let mut extractor = AdtsExtractor::default();
//! extractor.push_bytes(&std::fs::read("stream.aac")?);
//!
//! for frame_result in extractor {
//!     match frame_result {
//!         Ok(frame) => println!(
//!             "{} @ {:?} Hz, {} bytes",
//!             frame.header.profile(),
//!             frame.header.sampling_frequency(),
//!             frame.as_ref().len()
//!         ),
//!         // Recoverable: push more bytes and keep iterating.
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Processing functionality for continuous bitstreams.
///
/// Frame extraction ([`process::extract`]): locates sync words and carves
/// whole ADTS frames out of fragmented input.
pub mod process;

/// Data structures representing framing-format components.
///
/// - **ADTS headers** ([`structs::adts`]): fixed header fields and lookup tables
/// - **RTP headers** ([`structs::rtp`]): fixed 12-byte header and payload classification
/// - **MPEG-TS packets** ([`structs::mpegts`]): 188-byte sub-packet splitting
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bitstream I/O** ([`utils::bitstream_io`]): MSB-first bit-field reads
/// - **Error handling** ([`utils::errors`]): error types
pub mod utils;
