use crate::codec::Codec;
use crate::codec::reserve;
use crate::codec::take;
use crate::types::Result;

/// A write position over a borrowed output slice.
///
/// Each `write` hands the codec only the unwritten tail of the slice, so the
/// remaining capacity propagates from field to field and the cursor advances by
/// exactly what each codec reports. The first failure stops the composition.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Encodes one value at the cursor.
    pub fn write<T: Codec>(&mut self, value: &T) -> Result<usize> {
        let n = value.encode(&mut self.buf[self.pos..])?;
        self.pos += n;
        Ok(n)
    }

    /// Copies raw bytes at the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let dst = reserve(&mut self.buf[self.pos..], bytes.len())?;
        dst.copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(bytes.len())
    }

    /// Consumes the cursor, returning the total length written.
    pub fn finish(self) -> usize {
        self.pos
    }
}

/// A read position over a borrowed input slice.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Decodes one value at the cursor.
    pub fn read<T: Codec>(&mut self) -> Result<T> {
        let (value, n) = T::decode(&self.buf[self.pos..])?;
        self.pos += n;
        Ok(value)
    }

    /// Borrows `n` raw bytes at the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let buf: &'a [u8] = self.buf;
        let bytes = take(&buf[self.pos..], n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// The unread tail.
    pub fn as_slice(&self) -> &'a [u8] {
        let buf: &'a [u8] = self.buf;
        &buf[self.pos..]
    }
}
