//! Bitstream I/O utilities for header decoding.
//!
//! MSB-first bit extraction over byte buffers. Both ADTS and RTP pack
//! their headers big-endian bit-wise, so network byte order for the
//! multi-byte RTP fields falls out of plain 16/32-bit reads.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, UnsignedInteger};

#[derive(Debug)]
pub struct BitstreamIoReader<R: io::Read + io::Seek> {
    bs: BitReader<R, BigEndian>,
    len: u64,
}

pub type BsIoSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>>;

impl<R> BitstreamIoReader<R>
where
    R: io::Read + io::Seek,
{
    pub fn new(read: R, len_bytes: u64) -> Self {
        Self {
            bs: BitReader::new(read),
            len: len_bytes << 3,
        }
    }

    #[inline(always)]
    pub fn get(&mut self) -> io::Result<bool> {
        self.bs.read_bit()
    }

    /// Reads an `n`-bit unsigned field, MSB first.
    ///
    /// Fields may span byte boundaries at any bit offset; the canonical
    /// case is the 13-bit ADTS frame length built from 2 bits of one byte,
    /// a full byte, and 3 bits of a third.
    #[inline(always)]
    pub fn get_n<I: UnsignedInteger>(&mut self, n: u32) -> io::Result<I> {
        // Skip bounds check for small reads - bitstream_io handles EOF internally
        if n <= 32 {
            match self.bs.read_unsigned_var(n) {
                Ok(val) => Ok(val),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    // Only call position() on error path to avoid overhead
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "get_n({}): out of bounds bits at {}",
                            n,
                            self.bs.position_in_bits().unwrap_or(0)
                        ),
                    ))
                }
                Err(e) => Err(e),
            }
        } else {
            // For larger reads, keep bounds check
            self.available().and_then(|avail| {
                if n as u64 > avail {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "get_n({}): out of bounds bits at {}",
                            n,
                            self.bs.position_in_bits().unwrap_or(0)
                        ),
                    ))
                } else {
                    self.bs.read_unsigned_var(n)
                }
            })
        }
    }

    #[inline(always)]
    pub fn available(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits().map(|pos| self.len - pos)
    }

    #[inline(always)]
    pub fn skip_n(&mut self, n: u32) -> io::Result<()> {
        if n <= 64 {
            self.bs.skip(n)
        } else {
            self.available().and_then(|avail| {
                if n as u64 > avail {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "skip_n: out of bounds bits",
                    ))
                } else {
                    self.bs.skip(n)
                }
            })
        }
    }

    #[inline(always)]
    pub fn position(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits()
    }
}

impl<'a> BsIoSliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        let len = buf.len() as u64;
        let read = io::Cursor::new(buf);

        Self::new(read, len)
    }
}

impl Default for BsIoSliceReader<'_> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

#[test]
fn unaligned_field_spans_three_bytes() -> io::Result<()> {
    // 13-bit value 0x15A5 packed at bit offset 30:
    // 2 bits in byte 3, all of byte 4, 3 bits of byte 5.
    let value: u16 = 0x15A5;
    let buf = [
        0xFF,
        0xF1,
        0x50,
        0x40 | (value >> 11) as u8,
        (value >> 3) as u8,
        ((value & 0x7) as u8) << 5,
        0x00,
    ];

    let mut reader = BsIoSliceReader::from_slice(&buf);
    reader.skip_n(30)?;
    assert_eq!(reader.get_n::<u16>(13)?, value);
    assert_eq!(reader.position()?, 43);
    Ok(())
}

#[test]
fn read_past_end_reports_eof() {
    let buf = [0xAB];
    let mut reader = BsIoSliceReader::from_slice(&buf);
    assert_eq!(reader.get_n::<u16>(8).unwrap(), 0xAB);
    let err = reader.get_n::<u16>(8).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}
