//! ADTS fixed header structures.
//!
//! ## Frame Layout
//!
//! Every ADTS frame starts with a 7-byte fixed header whose first 12 bits
//! are the syncword `0xFFF`. The 13-bit `frame_length` field counts the
//! header itself, so a valid frame is never shorter than 7 bytes.
//!
//! ## Bit Order
//!
//! All fields are packed MSB first; `frame_length` spans byte indices 3-5
//! (2 + 8 + 3 bits).

use std::fmt::Display;

use anyhow::{Result, bail};

use crate::utils::bitstream_io::BsIoSliceReader;
use crate::utils::errors::AdtsError;

/// 12-bit syncword opening every ADTS frame.
pub const ADTS_SYNCWORD: u16 = 0xFFF;

/// Size of the fixed ADTS header in bytes, the minimum valid frame length.
pub const ADTS_HEADER_LEN: usize = 7;

/// Largest value representable by the 13-bit frame_length field.
pub const ADTS_MAX_FRAME_LEN: usize = 8191;

/// Sampling frequencies for sampling_frequency_index 0-11.
///
/// Indices 12-15 are reserved and map to no known rate.
pub const SAMPLING_FREQUENCIES: [u32; 12] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000,
];

/// AAC object type from the 2-bit profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Main,
    LowComplexity,
    Ssr,
    Unknown,
}

impl Profile {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Profile::Main,
            1 => Profile::LowComplexity,
            2 => Profile::Ssr,
            _ => Profile::Unknown,
        }
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Main => write!(f, "Main"),
            Profile::LowComplexity => write!(f, "LC"),
            Profile::Ssr => write!(f, "SSR"),
            Profile::Unknown => write!(f, "unknown"),
        }
    }
}

/// Decoded ADTS fixed header.
#[derive(Debug, Clone, Default)]
pub struct AdtsHeader {
    pub mpeg_version: u8,
    pub layer: u8,
    pub protection_absent: bool,
    pub profile_bits: u8,
    pub sampling_frequency_index: u8,
    pub private_bit: bool,
    pub channel_configuration: u8,
    pub original_copy: bool,
    pub home: bool,
    pub copyright_id_bit: bool,
    pub copyright_id_start: bool,
    pub frame_length: u16,
    pub buffer_fullness: u16,
    pub raw_data_blocks: u8,
}

impl AdtsHeader {
    /// Reads the 7-byte fixed header from the start of the reader.
    ///
    /// Fails on a syncword mismatch or a frame_length shorter than the
    /// header itself; both indicate the caller synchronized on a false
    /// positive.
    pub fn read(reader: &mut BsIoSliceReader) -> Result<Self> {
        let syncword: u16 = reader.get_n(12)?;
        if syncword != ADTS_SYNCWORD {
            bail!(AdtsError::InvalidSyncword(syncword));
        }

        let mut header = Self {
            mpeg_version: reader.get_n(1)?,
            layer: reader.get_n(2)?,
            protection_absent: reader.get()?,
            profile_bits: reader.get_n(2)?,
            sampling_frequency_index: reader.get_n(4)?,
            private_bit: reader.get()?,
            channel_configuration: reader.get_n(3)?,
            original_copy: reader.get()?,
            home: reader.get()?,
            copyright_id_bit: reader.get()?,
            copyright_id_start: reader.get()?,
            ..Default::default()
        };

        header.frame_length = reader.get_n(13)?;
        header.buffer_fullness = reader.get_n(11)?;
        header.raw_data_blocks = reader.get_n::<u8>(2)? + 1;

        if (header.frame_length as usize) < ADTS_HEADER_LEN {
            bail!(AdtsError::FrameLengthTooShort(header.frame_length));
        }

        Ok(header)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Self::read(&mut BsIoSliceReader::from_slice(data))
    }

    pub fn profile(&self) -> Profile {
        Profile::from_bits(self.profile_bits)
    }

    /// Sampling frequency in Hz, or `None` for the reserved indices 12-15.
    pub fn sampling_frequency(&self) -> Option<u32> {
        SAMPLING_FREQUENCIES
            .get(self.sampling_frequency_index as usize)
            .copied()
    }
}

/// Builds a syntactically valid ADTS frame for tests: a 7-byte header with
/// the requested fields and a zero-filled payload of `frame_length - 7`.
#[cfg(test)]
pub(crate) fn synth_frame(profile_bits: u8, frequency_index: u8, frame_length: usize) -> Vec<u8> {
    assert!((ADTS_HEADER_LEN..=ADTS_MAX_FRAME_LEN).contains(&frame_length));

    let len = frame_length as u16;
    let mut frame = vec![0u8; frame_length];
    frame[0] = 0xFF;
    frame[1] = 0xF1;
    frame[2] = (profile_bits << 6) | (frequency_index << 2);
    frame[3] = 0x40 | ((len >> 11) & 0x03) as u8;
    frame[4] = (len >> 3) as u8;
    frame[5] = ((len & 0x07) as u8) << 5 | 0x1F;
    frame[6] = 0xFC;
    frame
}

#[test]
fn profile_mapping() {
    assert_eq!(Profile::from_bits(0), Profile::Main);
    assert_eq!(Profile::from_bits(1), Profile::LowComplexity);
    assert_eq!(Profile::from_bits(2), Profile::Ssr);
    assert_eq!(Profile::from_bits(3), Profile::Unknown);

    assert_eq!(Profile::from_bits(1).to_string(), "LC");
    assert_eq!(Profile::from_bits(3).to_string(), "unknown");
}

#[test]
fn sampling_frequency_table() -> Result<()> {
    let expected = [
        96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000,
    ];

    for (index, frequency) in expected.iter().enumerate() {
        let frame = synth_frame(1, index as u8, 32);
        let header = AdtsHeader::from_slice(&frame)?;
        assert_eq!(header.sampling_frequency(), Some(*frequency));
    }

    for index in 12..16 {
        let frame = synth_frame(1, index, 32);
        let header = AdtsHeader::from_slice(&frame)?;
        assert_eq!(header.sampling_frequency(), None);
    }

    Ok(())
}

#[test]
fn frame_length_round_trip() -> Result<()> {
    for frame_length in [7usize, 8, 64, 1024, 4099, 8191] {
        let frame = synth_frame(2, 4, frame_length);
        assert_eq!(frame.len(), frame_length);

        let header = AdtsHeader::from_slice(&frame)?;
        assert_eq!(header.frame_length as usize, frame_length);
        assert_eq!(header.profile(), Profile::Ssr);
        assert_eq!(header.sampling_frequency(), Some(44100));
    }

    Ok(())
}

#[test]
fn rejects_bad_syncword() {
    let mut frame = synth_frame(0, 0, 16);
    frame[1] = 0x01;
    assert!(AdtsHeader::from_slice(&frame).is_err());
}

#[test]
fn rejects_undersized_frame_length() {
    let mut frame = synth_frame(0, 0, 16);
    // Rewrite frame_length bits to 3.
    frame[3] &= !0x03;
    frame[4] = 0;
    frame[5] &= 0x1F;
    frame[5] |= 3 << 5;
    assert!(AdtsHeader::from_slice(&frame).is_err());
}

#[test]
fn side_fields_decode() -> Result<()> {
    let frame = synth_frame(1, 3, 64);
    let header = AdtsHeader::from_slice(&frame)?;

    assert_eq!(header.mpeg_version, 0);
    assert_eq!(header.layer, 0);
    assert!(header.protection_absent);
    assert_eq!(header.channel_configuration, 1);
    assert_eq!(header.buffer_fullness, 0x7FF);
    assert_eq!(header.raw_data_blocks, 1);
    Ok(())
}
