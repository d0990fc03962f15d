//! RTP fixed header structures.
//!
//! ## Header Layout
//!
//! The 12-byte fixed header (RFC 3550), MSB first:
//!
//! byte 0: `version:2 | padding:1 | extension:1 | csrc_count:4`
//! byte 1: `marker:1 | payload_type:7`
//! bytes 2-3: sequence number, bytes 4-7: timestamp, bytes 8-11: SSRC,
//! all in network byte order.
//!
//! The header is treated as fixed-size: CSRC words, when present, are left
//! in the payload rather than skipped.

use std::fmt::Display;

use anyhow::{Result, bail};
use log::debug;

use crate::utils::bitstream_io::BsIoSliceReader;
use crate::utils::errors::RtpError;

/// Size of the fixed RTP header in bytes.
pub const RTP_HEADER_LEN: usize = 12;

/// Expected protocol version.
pub const RTP_VERSION: u8 = 2;

/// Decoded RTP fixed header.
#[derive(Debug, Clone, Default)]
pub struct RtpHeader {
    pub version: u8,
    pub padding: bool,
    pub extension: bool,
    pub csrc_count: u8,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
}

impl RtpHeader {
    /// Decodes the fixed header from the leading bytes of a datagram.
    ///
    /// A datagram shorter than 12 bytes fails with
    /// [`RtpError::TruncatedHeader`]; no partial decode is attempted.
    pub fn read(datagram: &[u8]) -> Result<Self> {
        if datagram.len() < RTP_HEADER_LEN {
            bail!(RtpError::TruncatedHeader {
                len: datagram.len()
            });
        }

        let reader = &mut BsIoSliceReader::from_slice(&datagram[..RTP_HEADER_LEN]);

        let header = Self {
            version: reader.get_n(2)?,
            padding: reader.get()?,
            extension: reader.get()?,
            csrc_count: reader.get_n(4)?,
            marker: reader.get()?,
            payload_type: reader.get_n(7)?,
            sequence_number: reader.get_n(16)?,
            timestamp: reader.get_n(32)?,
            ssrc: reader.get_n(32)?,
        };

        if header.version != RTP_VERSION {
            debug!(
                "RTP version {} (expected {RTP_VERSION}), ssrc {:#010X}",
                header.version, header.ssrc
            );
        }

        Ok(header)
    }

    pub fn payload_kind(&self) -> PayloadKind {
        PayloadKind::from_payload_type(self.payload_type)
    }

    /// Bytes of the datagram after the fixed header.
    pub fn payload<'a>(&self, datagram: &'a [u8]) -> &'a [u8] {
        &datagram[RTP_HEADER_LEN..]
    }
}

/// Payload classification per the RFC 3551 static assignments used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Audio,
    H261,
    Mpv,
    Mp2t,
    H263,
    H264,
    Other,
}

impl PayloadKind {
    pub fn from_payload_type(payload_type: u8) -> Self {
        match payload_type {
            0..=18 => PayloadKind::Audio,
            31 => PayloadKind::H261,
            32 => PayloadKind::Mpv,
            33 => PayloadKind::Mp2t,
            34 => PayloadKind::H263,
            96 => PayloadKind::H264,
            _ => PayloadKind::Other,
        }
    }
}

impl Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadKind::Audio => write!(f, "Audio"),
            PayloadKind::H261 => write!(f, "H.261"),
            PayloadKind::Mpv => write!(f, "MPV"),
            PayloadKind::Mp2t => write!(f, "MP2T"),
            PayloadKind::H263 => write!(f, "H.263"),
            PayloadKind::H264 => write!(f, "H.264"),
            PayloadKind::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
pub(crate) fn synth_datagram(payload_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut datagram = vec![0u8; RTP_HEADER_LEN];
    datagram[0] = 0x80;
    datagram[1] = payload_type & 0x7F;
    datagram[2..4].copy_from_slice(&0x1234u16.to_be_bytes());
    datagram[4..8].copy_from_slice(&0xDEADBEEFu32.to_be_bytes());
    datagram[8..12].copy_from_slice(&0x0000_2710u32.to_be_bytes());
    datagram.extend_from_slice(payload);
    datagram
}

#[test]
fn fixed_header_fields() -> Result<()> {
    let datagram = synth_datagram(33, &[0x47, 0x00]);
    let header = RtpHeader::read(&datagram)?;

    assert_eq!(header.version, 2);
    assert!(!header.padding);
    assert!(!header.extension);
    assert_eq!(header.csrc_count, 0);
    assert!(!header.marker);
    assert_eq!(header.payload_type, 33);
    assert_eq!(header.sequence_number, 0x1234);
    assert_eq!(header.timestamp, 0xDEADBEEF);
    assert_eq!(header.ssrc, 10000);
    assert_eq!(header.payload(&datagram), &[0x47, 0x00]);
    Ok(())
}

#[test]
fn truncated_datagram_is_rejected() {
    let err = RtpHeader::read(&[0x80; 11]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RtpError>(),
        Some(RtpError::TruncatedHeader { len: 11 })
    ));
}

#[test]
fn payload_kind_table() {
    for payload_type in 0..=18 {
        assert_eq!(
            PayloadKind::from_payload_type(payload_type),
            PayloadKind::Audio
        );
    }
    assert_eq!(PayloadKind::from_payload_type(31), PayloadKind::H261);
    assert_eq!(PayloadKind::from_payload_type(32), PayloadKind::Mpv);
    assert_eq!(PayloadKind::from_payload_type(33), PayloadKind::Mp2t);
    assert_eq!(PayloadKind::from_payload_type(34), PayloadKind::H263);
    assert_eq!(PayloadKind::from_payload_type(96), PayloadKind::H264);
    assert_eq!(PayloadKind::from_payload_type(19), PayloadKind::Other);
    assert_eq!(PayloadKind::from_payload_type(127), PayloadKind::Other);

    assert_eq!(PayloadKind::Mp2t.to_string(), "MP2T");
    assert_eq!(PayloadKind::Other.to_string(), "other");
}

#[test]
fn marker_and_flag_bits() -> Result<()> {
    let mut datagram = synth_datagram(96, &[]);
    datagram[0] = 0xB3; // version 2, padding, extension, csrc_count 3
    datagram[1] |= 0x80; // marker
    let header = RtpHeader::read(&datagram)?;

    assert!(header.padding);
    assert!(header.extension);
    assert_eq!(header.csrc_count, 3);
    assert!(header.marker);
    assert_eq!(header.payload_kind(), PayloadKind::H264);
    Ok(())
}
