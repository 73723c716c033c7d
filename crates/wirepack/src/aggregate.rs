//! Codecs composed from the scalar codecs.
//!
//! Every aggregate is built by sequential `encode`/`decode` calls on a cursor, so a
//! failure in any part aborts the whole value with that part's error.

use crate::codec::Codec;
use crate::cursor::ReadCursor;
use crate::cursor::WriteCursor;
use crate::macros::impl_tuple;
use crate::types::Error;
use crate::types::Result;

const NONE: u8 = 0;
const SOME: u8 = 1;
const OK: u8 = 0;
const ERR: u8 = 1;

fn write_len(cursor: &mut WriteCursor, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| Error::LengthOverflow(len))?;
    cursor.write(&len)?;
    Ok(())
}

fn read_len(cursor: &mut ReadCursor) -> Result<usize> {
    let len = cursor.read::<u32>()?;
    usize::try_from(len).map_err(|_| Error::LengthOverflow(usize::MAX))
}

impl Codec for String {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut cursor = WriteCursor::new(out);
        write_len(&mut cursor, self.len())?;
        cursor.write_bytes(self.as_bytes())?;
        Ok(cursor.finish())
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ReadCursor::new(input);
        let len = read_len(&mut cursor)?;
        let bytes = cursor.read_bytes(len)?;
        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
        Ok((s.to_owned(), cursor.position()))
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut cursor = WriteCursor::new(out);
        write_len(&mut cursor, self.len())?;
        for item in self {
            cursor.write(item)?;
        }
        Ok(cursor.finish())
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ReadCursor::new(input);
        let count = read_len(&mut cursor)?;
        // The count comes off the wire; never reserve more than the input could hold.
        let mut items = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            items.push(cursor.read::<T>()?);
        }
        Ok((items, cursor.position()))
    }
}

impl<T: Codec> Codec for Option<T> {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut cursor = WriteCursor::new(out);
        match self {
            None => {
                cursor.write(&NONE)?;
            }
            Some(v) => {
                cursor.write(&SOME)?;
                cursor.write(v)?;
            }
        }
        Ok(cursor.finish())
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ReadCursor::new(input);
        let value = match cursor.read::<u8>()? {
            NONE => None,
            SOME => Some(cursor.read::<T>()?),
            b => return Err(Error::InvalidDiscriminant(b)),
        };
        Ok((value, cursor.position()))
    }
}

impl<T: Codec, E: Codec> Codec for std::result::Result<T, E> {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut cursor = WriteCursor::new(out);
        match self {
            Ok(v) => {
                cursor.write(&OK)?;
                cursor.write(v)?;
            }
            Err(e) => {
                cursor.write(&ERR)?;
                cursor.write(e)?;
            }
        }
        Ok(cursor.finish())
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ReadCursor::new(input);
        let value = match cursor.read::<u8>()? {
            OK => Ok(cursor.read::<T>()?),
            ERR => Err(cursor.read::<E>()?),
            b => return Err(Error::InvalidDiscriminant(b)),
        };
        Ok((value, cursor.position()))
    }
}

impl<T: Codec> Codec for Box<T> {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        (**self).encode(out)
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let (value, n) = T::decode(input)?;
        Ok((Box::new(value), n))
    }
}

/// Fixed arrays carry no length prefix; `N` is part of the schema.
impl<T: Codec, const N: usize> Codec for [T; N] {
    fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut cursor = WriteCursor::new(out);
        for item in self {
            cursor.write(item)?;
        }
        Ok(cursor.finish())
    }

    fn decode(input: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ReadCursor::new(input);
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(cursor.read::<T>()?);
        }
        let array = <[T; N]>::try_from(items).map_err(|_| Error::LengthOverflow(N))?;
        Ok((array, cursor.position()))
    }
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
impl_tuple!(A, B, C, D, E);
impl_tuple!(A, B, C, D, E, F);
impl_tuple!(A, B, C, D, E, F, G);
impl_tuple!(A, B, C, D, E, F, G, H);
