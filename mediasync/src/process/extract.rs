use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;

use crate::structs::adts::{ADTS_HEADER_LEN, AdtsHeader};
use crate::utils::errors::ExtractError;

/// Extracts ADTS frames from a continuous bitstream.
///
/// Frame boundary detection by scanning for the 12-bit syncword and
/// validating the header-declared frame length. Input arrives in arbitrary
/// chunks via [`push_bytes`](AdtsExtractor::push_bytes); unconsumed bytes
/// stay in the internal ring buffer between pushes, so a frame split across
/// two reads decodes once its tail arrives.
///
/// # Example
///
/// ```rust,no_run
/// use mediasync::process::extract::AdtsExtractor;
///
/// let mut extractor = AdtsExtractor::default();
/// let data = std::fs::read("stream.aac")?;
/// extractor.push_bytes(&data);
///
/// for frame in extractor {
///     let frame = frame?;
///     println!(
///         "{} {:?} {} bytes",
///         frame.header.profile(),
///         frame.header.sampling_frequency(),
///         frame.as_ref().len()
///     );
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct AdtsExtractor {
    buffer: VecDeque<u8>,
    io_counter: usize,
    frames_processed: usize,
    bytes_skipped: u64,
}

impl Default for AdtsExtractor {
    fn default() -> Self {
        Self {
            buffer: VecDeque::with_capacity(1 << 20),
            io_counter: 0,
            frames_processed: 0,
            bytes_skipped: 0,
        }
    }
}

impl AdtsExtractor {
    /// Adds raw bitstream data to the internal buffer.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend(data);
        self.io_counter += 1;
    }

    /// Bytes dropped so far while scanning for a syncword.
    ///
    /// Zero for a clean stream; anything else means the input contained
    /// garbage or a false sync forced a one-byte restart.
    pub fn bytes_skipped(&self) -> u64 {
        self.bytes_skipped
    }

    /// Frames successfully extracted so far.
    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    /// Unconsumed bytes held in the ring buffer.
    ///
    /// At end of input a remnant shorter than a header is a truncated
    /// partial frame; the driver discards it.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Position of the first syncword candidate: `0xFF` followed by a byte
    /// whose top nibble is `0xF`. One byte at a time, no skip heuristics;
    /// misaligned streams only resynchronize correctly this way.
    fn find_sync(&self) -> Option<usize> {
        let len = self.buffer.len();
        (0..len.saturating_sub(1))
            .find(|&i| self.buffer[i] == 0xFF && self.buffer[i + 1] & 0xF0 == 0xF0)
    }

    /// Frame length peeked from header bytes 3-5 of the buffer front:
    /// 2 + 8 + 3 bits, MSB first, header bytes included in the count.
    fn frame_length_at_front(&self) -> Option<usize> {
        let b3 = *self.buffer.get(3)?;
        let b4 = *self.buffer.get(4)?;
        let b5 = *self.buffer.get(5)?;

        Some((((b3 & 0x03) as usize) << 11) | ((b4 as usize) << 3) | ((b5 >> 5) as usize))
    }

    fn consume_front(&mut self, cnt: usize) {
        self.buffer.drain(..cnt);
    }

    fn skip_front(&mut self, cnt: usize) {
        self.consume_front(cnt);
        self.bytes_skipped += cnt as u64;
    }

    fn insufficient(&mut self, error: ExtractError) -> Option<Result<AdtsFrame, ExtractError>> {
        self.io_counter -= 1;
        Some(Err(error))
    }
}

impl Iterator for AdtsExtractor {
    type Item = Result<AdtsFrame, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.io_counter == 0 {
            return None;
        }

        loop {
            let Some(offset) = self.find_sync() else {
                // No marker anywhere; keep the final byte, it may open a
                // syncword completed by the next read.
                let scanned = self.buffer.len().saturating_sub(1);
                if scanned > 0 {
                    debug!("No syncword in {scanned} scanned bytes");
                    self.skip_front(scanned);
                }
                return self.insufficient(ExtractError::NoSyncFound);
            };

            if offset > 0 {
                debug!("Skipping {offset} bytes to syncword candidate");
                self.skip_front(offset);
            }

            if self.buffer.len() < ADTS_HEADER_LEN {
                return self.insufficient(ExtractError::InsufficientData);
            }

            let Some(frame_length) = self.frame_length_at_front() else {
                return self.insufficient(ExtractError::InsufficientData);
            };

            if frame_length < ADTS_HEADER_LEN {
                // frame_length counts the header itself; a shorter claim is
                // a false sync, restart one byte later.
                debug!("False sync: frame_length {frame_length} < {ADTS_HEADER_LEN}");
                self.skip_front(1);
                continue;
            }

            if self.buffer.len() < frame_length {
                // The candidate stays at the buffer front: a truncated true
                // frame and a false sync cannot be told apart until the
                // missing bytes arrive.
                return self.insufficient(ExtractError::InsufficientData);
            }

            let mut header_bytes = [0u8; ADTS_HEADER_LEN];
            for (dst, src) in header_bytes.iter_mut().zip(self.buffer.iter()) {
                *dst = *src;
            }

            let header = match AdtsHeader::from_slice(&header_bytes) {
                Ok(header) => header,
                Err(e) => {
                    debug!("Header rejected at syncword candidate: {e}");
                    self.skip_front(1);
                    continue;
                }
            };

            let data: Vec<u8> = self.buffer.drain(..frame_length).collect();

            self.frames_processed += 1;
            return Some(Ok(AdtsFrame {
                header,
                data: data.into(),
            }));
        }
    }
}

/// A single ADTS frame extracted from a bitstream.
///
/// Carries the decoded fixed header and the raw frame bytes, header
/// included, of exactly `header.frame_length` bytes.
#[derive(Debug, Clone)]
pub struct AdtsFrame {
    pub header: AdtsHeader,
    pub data: Arc<[u8]>,
}

impl AsRef<[u8]> for AdtsFrame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
use crate::structs::adts::synth_frame;

#[test]
fn extracts_frame_behind_garbage_prefix() {
    let mut extractor = AdtsExtractor::default();

    let mut data = vec![0x00, 0x12, 0xFE, 0x47, 0xAA];
    data.extend_from_slice(&synth_frame(1, 3, 64));
    extractor.push_bytes(&data);

    let frame = extractor.next().unwrap().unwrap();
    assert_eq!(frame.as_ref().len(), 64);
    assert_eq!(frame.header.frame_length, 64);
    assert_eq!(extractor.bytes_skipped(), 5);
}

#[test]
fn trailing_remnant_stays_unconsumed() {
    let mut extractor = AdtsExtractor::default();

    let mut data = synth_frame(0, 4, 100);
    data.extend_from_slice(&[0xFF, 0xF1, 0x00]); // shorter than a header
    extractor.push_bytes(&data);

    let frame = extractor.next().unwrap().unwrap();
    assert_eq!(frame.as_ref().len(), 100);

    assert!(matches!(
        extractor.next(),
        Some(Err(ExtractError::InsufficientData))
    ));
    assert_eq!(extractor.pending_bytes(), 3);
    assert!(extractor.next().is_none());
}

#[test]
fn split_frame_completes_on_next_push() {
    let mut extractor = AdtsExtractor::default();
    let frame_bytes = synth_frame(2, 7, 512);

    extractor.push_bytes(&frame_bytes[..200]);
    assert!(matches!(
        extractor.next(),
        Some(Err(ExtractError::InsufficientData))
    ));
    assert!(extractor.next().is_none());

    extractor.push_bytes(&frame_bytes[200..]);
    let frame = extractor.next().unwrap().unwrap();
    assert_eq!(frame.as_ref().len(), 512);
    assert_eq!(frame.as_ref(), &frame_bytes[..]);
    assert_eq!(extractor.bytes_skipped(), 0);
}

#[test]
fn false_sync_restarts_one_byte_later() {
    let mut extractor = AdtsExtractor::default();

    // Valid-looking syncword whose frame_length decodes to 0.
    let mut data = vec![0xFF, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    data.extend_from_slice(&synth_frame(1, 11, 32));
    extractor.push_bytes(&data);

    let frame = extractor.next().unwrap().unwrap();
    assert_eq!(frame.header.sampling_frequency(), Some(8000));
    assert_eq!(frame.as_ref().len(), 32);
    assert!(extractor.bytes_skipped() > 0);
}

#[test]
fn stream_without_sync_yields_no_frames() {
    let mut extractor = AdtsExtractor::default();

    let data: Vec<u8> = (0..4096).map(|i| (i % 199) as u8).collect();
    extractor.push_bytes(&data);

    assert!(matches!(
        extractor.next(),
        Some(Err(ExtractError::NoSyncFound))
    ));
    assert!(extractor.next().is_none());
    assert_eq!(extractor.frames_processed(), 0);
    assert!(extractor.pending_bytes() <= 1);
}

#[test]
fn back_to_back_frames_extract_in_order() {
    let mut extractor = AdtsExtractor::default();

    let mut data = Vec::new();
    for (profile, length) in [(0u8, 31usize), (1, 256), (2, 8191), (1, 7)] {
        data.extend_from_slice(&synth_frame(profile, 4, length));
    }
    extractor.push_bytes(&data);

    let lengths: Vec<usize> = extractor
        .by_ref()
        .filter_map(Result::ok)
        .map(|frame| frame.as_ref().len())
        .collect();
    assert_eq!(lengths, [31, 256, 8191, 7]);
    assert_eq!(extractor.frames_processed(), 4);
    assert_eq!(extractor.bytes_skipped(), 0);
}
