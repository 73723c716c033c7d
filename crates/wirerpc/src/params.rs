//! # Parameter Packs and Result Slots
//!
//! A call's arguments travel as one tuple; the tuple codec concatenates the
//! arguments in declared order, so `()` is zero bytes and `(a, b)` is `a` then `b`.

use wirepack::Codec;
use wirepack::Error;
use wirepack::Result;

/// The marshaled arguments of one call.
///
/// Owns its encoded bytes for as long as the call is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    buf: Vec<u8>,
}

impl ParameterSet {
    /// Encodes an argument tuple into at most `capacity` bytes.
    ///
    /// # Errors
    /// Returns the first element's failure, or `BufferFull` if the total exceeds `capacity`.
    pub fn encode<A: Codec>(args: &A, capacity: usize) -> Result<Self> {
        Ok(Self { buf: wirepack::encode_to_vec(args, capacity)? })
    }

    /// Wraps bytes that are already encoded.
    pub fn from_bytes(buf: Vec<u8>) -> Self {
        Self { buf }
    }

    /// Decodes the whole set as the argument tuple `A`.
    pub fn decode<A: Codec>(&self) -> Result<A> {
        wirepack::decode_exact(&self.buf)
    }

    /// Copies the encoded arguments into `out`, returning the length written.
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        let available = out.len();
        let dst = out
            .get_mut(..self.buf.len())
            .ok_or(Error::BufferFull { needed: self.buf.len(), available })?;
        dst.copy_from_slice(&self.buf);
        Ok(self.buf.len())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// The receiving end of a response, independent of the result type.
///
/// Transports fill a [`ResultSlot`] through this trait without knowing `R`.
pub trait ResponseHandler {
    /// Decodes the response payload, returning the length consumed.
    fn handle_response(&mut self, input: &[u8]) -> Result<usize>;
}

/// Owns the decoded return value of one call.
///
/// Allocated empty by the caller before the call, filled only by a successful
/// decode, and released on drop.
#[derive(Debug)]
pub struct ResultSlot<R> {
    value: Option<R>,
}

impl<R> ResultSlot<R> {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// The decoded value, if the response has been handled.
    pub fn data(&self) -> Option<&R> {
        self.value.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut R> {
        self.value.as_mut()
    }

    pub fn into_inner(self) -> Option<R> {
        self.value
    }
}

impl<R> Default for ResultSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Codec> ResponseHandler for ResultSlot<R> {
    fn handle_response(&mut self, input: &[u8]) -> Result<usize> {
        // A failed decode leaves the slot as it was.
        let (value, consumed) = R::decode(input)?;
        self.value = Some(value);
        Ok(consumed)
    }
}
