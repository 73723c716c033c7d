//! The per-type encode/decode contract and the scalar codecs.

use crate::macros::for_each_fixed_width;
use crate::macros::impl_fixed_width;
use crate::types::Error;
use crate::types::Result;

/// A stateless encode/decode pair for one type.
///
/// # Invariants
///
/// - `encode` treats `out.len()` as its capacity. On success it returns the number of
///   bytes written, which is never more than the capacity. If the encoding does not fit
///   it returns `Error::BufferFull` and reports no length.
/// - `decode` treats `input.len()` as the bytes available. On success it returns the
///   value and the number of bytes consumed. Bytes past the value are left alone.
/// - For every value `v`, decoding the output of `encode(v)` yields `v` and consumes
///   exactly as many bytes as `encode` produced.
pub trait Codec: Sized {
    /// Writes the canonical bytes of `self` into `out`, returning the length written.
    fn encode(&self, out: &mut [u8]) -> Result<usize>;

    /// Reads one value from the front of `input`, returning it with the length consumed.
    fn decode(input: &[u8]) -> Result<(Self, usize)>;
}

/// Returns the first `n` bytes of `out`, or `BufferFull` without touching anything.
#[inline]
pub(crate) fn reserve(out: &mut [u8], n: usize) -> Result<&mut [u8]> {
    let available = out.len();
    out.get_mut(..n).ok_or(Error::BufferFull { needed: n, available })
}

/// Returns the first `n` bytes of `input`, or `UnexpectedEnd`.
#[inline]
pub(crate) fn take(input: &[u8], n: usize) -> Result<&[u8]> {
    input.get(..n).ok_or(Error::UnexpectedEnd { needed: n, available: input.len() })
}

for_each_fixed_width!(impl_fixed_width);

impl Codec for bool {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        u8::from(*self).encode(out)
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        match u8::decode(input)? {
            (0, n) => Ok((false, n)),
            (1, n) => Ok((true, n)),
            (b, _) => Err(Error::InvalidDiscriminant(b)),
        }
    }
}

impl Codec for char {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        u32::from(*self).encode(out)
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let (raw, n) = u32::decode(input)?;
        let c = char::from_u32(raw).ok_or(Error::InvalidChar(raw))?;
        Ok((c, n))
    }
}

/// Always 8 bytes on the wire, whatever the platform width.
impl Codec for usize {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let wide = u64::try_from(*self).map_err(|_| Error::LengthOverflow(*self))?;
        wide.encode(out)
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let (wide, n) = u64::decode(input)?;
        let v = usize::try_from(wide).map_err(|_| Error::LengthOverflow(usize::MAX))?;
        Ok((v, n))
    }
}

impl Codec for isize {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let wide = i64::try_from(*self).map_err(|_| Error::LengthOverflow(self.unsigned_abs()))?;
        wide.encode(out)
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let (wide, n) = i64::decode(input)?;
        let v = isize::try_from(wide).map_err(|_| Error::LengthOverflow(wide.unsigned_abs() as usize))?;
        Ok((v, n))
    }
}

/// Unit is zero bytes; an empty parameter list encodes to nothing.
impl Codec for () {
    fn encode(&self, _out: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    fn decode(_input: &[u8]) -> Result<(Self, usize)> {
        Ok(((), 0))
    }
}

/// Encodes `value` into a fresh buffer of `capacity` bytes and trims it to the used length.
pub fn encode_to_vec<T: Codec>(value: &T, capacity: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; capacity];
    let written = value.encode(&mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

/// Decodes a value that must account for every byte of `input`.
///
/// # Errors
/// Returns `Error::TrailingBytes` if the value ends before the input does.
pub fn decode_exact<T: Codec>(input: &[u8]) -> Result<T> {
    let (value, consumed) = T::decode(input)?;
    if consumed != input.len() {
        return Err(Error::TrailingBytes(input.len() - consumed));
    }
    Ok(value)
}
