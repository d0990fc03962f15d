//! Utility functions and supporting infrastructure.
//!
//! Provides bitstream I/O and error types shared by the header decoders
//! and the stream extractor.

pub mod bitstream_io;
pub mod errors;
