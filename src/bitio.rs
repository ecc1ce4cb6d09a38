//! Bit-granularity sinks and sources.
//!
//! Bits are packed most significant first. [`CompressedStream`] keeps them in
//! memory with an exact bit length; [`BitWriter`] and [`BitReader`] move them
//! through `std::io`, ending the byte stream with one trailer byte that
//! records how many bits of the last data byte are valid.
//!
//! ```text
//! bits:   1 0 1 1 0 0 1 0 | 1 1 0
//! bytes:  0b1011_0010, 0b1100_0000, 3
//!                      ^ partial    ^ trailer
//! ```
//!
//! An empty bit stream is written as zero bytes.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read, Write};

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// Something bits can be appended to.
pub trait BitSink {
    /// Append one bit.
    fn write_bit(&mut self, bit: bool) -> Result<()>;
}

/// Something bits can be read from, in order.
pub trait BitSource {
    /// Read the next bit, or `None` once the source is exhausted.
    fn read_bit(&mut self) -> Result<Option<bool>>;
}

impl<T: BitSink + ?Sized> BitSink for &mut T {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        (**self).write_bit(bit)
    }
}

impl<T: BitSource + ?Sized> BitSource for &mut T {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        (**self).read_bit()
    }
}

/// An in-memory compressed bit stream.
///
/// Holds exactly [`len`](Self::len) bits; the unused low bits of the last
/// byte are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedStream {
    bits: BitVec<u8, Msb0>,
}

impl CompressedStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `bit_len` bits packed into `bytes`.
    ///
    /// Returns `None` if `bytes` is too short for `bit_len`, or longer than
    /// needed.
    pub fn from_bytes(bytes: Vec<u8>, bit_len: u64) -> Option<Self> {
        if bit_len.div_ceil(8) != bytes.len() as u64 {
            return None;
        }
        let mut bits = BitVec::from_vec(bytes);
        bits.truncate(bit_len as usize);
        bits.set_uninitialized(false);
        Some(Self { bits })
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Bit at `index`, if in range.
    pub fn get(&self, index: u64) -> Option<bool> {
        self.bits.get(index as usize).map(|bit| *bit)
    }

    /// Number of bits.
    pub fn len(&self) -> u64 {
        self.bits.len() as u64
    }

    /// True if the stream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The packed bytes, zero-padded at the end.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// The bits as a slice.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// Reading cursor over the bits.
    pub fn bits(&self) -> Bits<'_> {
        Bits {
            iter: self.bits.iter(),
        }
    }
}

impl BitSink for CompressedStream {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

impl FromIterator<bool> for CompressedStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Renders the bits as a string of `0` and `1`.
impl fmt::Display for CompressedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Cursor over the bits of a [`CompressedStream`].
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    iter: bitvec::slice::Iter<'a, u8, Msb0>,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.iter.next().map(|bit| *bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl BitSource for Bits<'_> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.next())
    }
}

/// Packs bits into bytes on an underlying writer.
///
/// Call [`finish`](Self::finish) to write the final partial byte and the
/// trailer; bits still buffered when the writer is dropped are lost.
pub struct BitWriter<W: Write> {
    inner: W,
    pending: BitVec<u8, Msb0>,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Wrap `inner`. Pass a buffered writer for file output.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: BitVec::with_capacity(8),
            bits_written: 0,
        }
    }

    /// Number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Write the last partial byte and the trailer, flush, and hand back
    /// the inner writer.
    pub fn finish(mut self) -> Result<W> {
        if self.bits_written > 0 {
            let filled = self.pending.len() as u8;
            self.pending.set_uninitialized(false);
            let last = self.pending.as_raw_slice().first().copied().unwrap_or(0);
            self.inner.write_all(&[last, filled])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.pending.push(bit);
        self.bits_written += 1;
        if self.pending.len() == 8 {
            self.inner.write_all(self.pending.as_raw_slice())?;
            self.pending.clear();
        }
        Ok(())
    }
}

/// Reads bits written by a [`BitWriter`].
pub struct BitReader<R: Read> {
    bytes: io::Bytes<R>,
    // Up to three bytes past `current`, enough to spot the trailer.
    ahead: VecDeque<u8>,
    eof: bool,
    current: u8,
    pos: usize,
    valid: usize,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Wrap `inner`. Pass a buffered reader for file input.
    pub fn new(inner: R) -> Self {
        Self {
            bytes: inner.bytes(),
            ahead: VecDeque::with_capacity(3),
            eof: false,
            current: 0,
            pos: 0,
            valid: 0,
            bits_read: 0,
        }
    }

    /// Number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    fn fill(&mut self) -> Result<()> {
        while self.ahead.len() < 3 && !self.eof {
            match self.bytes.next() {
                Some(byte) => self.ahead.push_back(byte?),
                None => self.eof = true,
            }
        }
        Ok(())
    }

    // Load the next data byte into `current`. Returns false at end of data.
    fn load_next(&mut self) -> Result<bool> {
        self.fill()?;
        let (byte, valid) = match self.ahead.len() {
            0 => return Ok(false),
            1 => return Err(Error::MissingTrailer),
            2 if self.eof => {
                let trailer = self.ahead[1];
                if trailer > 7 {
                    return Err(Error::InvalidTrailer(trailer));
                }
                let byte = self.ahead[0];
                self.ahead.clear();
                (byte, trailer as usize)
            }
            _ => (self.ahead.pop_front().unwrap_or_default(), 8),
        };
        self.current = byte;
        self.pos = 0;
        self.valid = valid;
        Ok(true)
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        while self.pos == self.valid {
            if !self.load_next()? {
                return Ok(None);
            }
        }
        let bit = self.current.view_bits::<Msb0>()[self.pos];
        self.pos += 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain<S: BitSource>(mut source: S) -> Result<Vec<bool>> {
        let mut out = Vec::new();
        while let Some(bit) = source.read_bit()? {
            out.push(bit);
        }
        Ok(out)
    }

    fn write_all(bits: &[bool]) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        for &bit in bits {
            writer.write_bit(bit).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn stream_packs_msb_first() {
        let stream: CompressedStream = [true, false, true, true, false, false, true, false, true, true, false]
            .into_iter()
            .collect();
        assert_eq!(stream.len(), 11);
        assert_eq!(stream.as_bytes(), &[0b1011_0010, 0b1100_0000]);
        assert_eq!(stream.to_string(), "10110010110");
        assert_eq!(stream.get(11), None);
    }

    #[test]
    fn from_bytes_checks_length_and_masks_padding() {
        assert_eq!(CompressedStream::from_bytes(vec![0xFF], 9), None);
        assert_eq!(CompressedStream::from_bytes(vec![0xFF, 0xFF], 8), None);

        let stream = CompressedStream::from_bytes(vec![0xFF], 3).unwrap();
        assert_eq!(stream.as_bytes(), &[0b1110_0000]);
        assert_eq!(stream.to_string(), "111");

        let empty = CompressedStream::from_bytes(Vec::new(), 0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn writer_layout_matches_doc() {
        let bits = [true, false, true, true, false, false, true, false, true, true, false];
        assert_eq!(write_all(&bits), vec![0b1011_0010, 0b1100_0000, 3]);
    }

    #[test]
    fn writer_byte_aligned_has_empty_last_byte() {
        let bits = [true; 8];
        assert_eq!(write_all(&bits), vec![0xFF, 0x00, 0]);
        assert_eq!(drain(BitReader::new(&[0xFFu8, 0x00, 0][..])).unwrap(), bits.to_vec());
    }

    #[test]
    fn writer_zeroes_padding_after_full_bytes() {
        let mut bits = vec![true; 8];
        bits.extend([true, false]);
        assert_eq!(write_all(&bits), vec![0xFF, 0b1000_0000, 2]);
    }

    #[test]
    fn empty_writer_writes_nothing() {
        assert!(write_all(&[]).is_empty());
        assert!(drain(BitReader::new(&[0u8; 0][..])).unwrap().is_empty());
    }

    #[test]
    fn reader_rejects_bad_trailers() {
        assert!(matches!(
            drain(BitReader::new(&[0xABu8][..])),
            Err(Error::MissingTrailer)
        ));
        assert!(matches!(
            drain(BitReader::new(&[0xABu8, 9][..])),
            Err(Error::InvalidTrailer(9))
        ));
    }

    #[test]
    fn reader_counts_bits() {
        let mut reader = BitReader::new(&[0b0100_0000u8, 2][..]);
        assert_eq!(reader.read_bit().unwrap(), Some(false));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bit().unwrap(), None);
        assert_eq!(reader.bits_read(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_writer_reader_agree(bits in prop::collection::vec(any::<bool>(), 0..200)) {
            let bytes = write_all(&bits);
            prop_assert_eq!(drain(BitReader::new(&bytes[..])).unwrap(), bits.clone());

            let stream: CompressedStream = bits.iter().copied().collect();
            prop_assert_eq!(stream.len(), bits.len() as u64);
            prop_assert_eq!(drain(stream.bits()).unwrap(), bits);
        }
    }
}
