//! A bounds-checked, big-endian cursor over a byte slice.
//!
//! Every read either returns the full value and advances the cursor, or fails
//! with [`ErrorKind::OutOfBounds`][crate::error::ErrorKind::OutOfBounds] and
//! leaves the cursor where it was. Nothing is ever silently truncated.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Sequential reader over a fixed buffer. Values are big-endian, matching the
/// on-disk convention of both region files and tag trees.
#[derive(Debug, Clone)]
pub struct Reader<'de> {
    data: &'de [u8],
    pos: usize,
}

impl<'de> Reader<'de> {
    pub fn new(data: &'de [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn consume(&mut self, n: usize) -> Result<&'de [u8]> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => {
                let ret = &self.data[self.pos..end];
                self.pos = end;
                Ok(ret)
            }
            _ => Err(Error::out_of_bounds(n, self.remaining())),
        }
    }

    /// Advance past `n` bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.consume(n).map(|_| ())
    }

    /// Borrow the next `n` bytes from the underlying buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'de [u8]> {
        self.consume(n)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.consume(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.consume(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.consume(2)?))
    }

    /// Read a 3 byte big-endian unsigned integer, as used for sector offsets.
    pub fn read_u24(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u24(self.consume(3)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.consume(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.consume(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.consume(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.consume(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.consume(8)?))
    }
}
