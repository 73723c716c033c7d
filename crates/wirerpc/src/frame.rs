//! # Protocol Frames
//!
//! The envelope around a call on a byte link.
//!
//! - Request: `[instance: u32][function: u32][len: u32][params: len]`
//! - Response: `[status: u8][len: u32][payload: len]`
//!
//! ## Invariants
//! - **Panic Safety**: All decoding paths return `Result`, never panicking on unknown data.
//! - **Exactness**: A frame must account for every byte it arrives in.

use wirepack::Codec;
use wirepack::Error;
use wirepack::impl_codec_struct;
use wirepack::types::LEN_PREFIX;

use crate::ids::CallIdentifier;
use crate::procedure::DispatchError;

/// Outcome of a call as reported on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0x00,
    UnknownInstance = 0x01,
    UnknownFunction = 0x02,
    BadArguments = 0x03,
    ResponseOverflow = 0x04,
    SignatureMismatch = 0x05,
    /// The request frame itself could not be parsed.
    Malformed = 0x06,
}

impl Status {
    /// Returns the Status for a given byte, or `None` if invalid.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::UnknownInstance),
            0x02 => Some(Status::UnknownFunction),
            0x03 => Some(Status::BadArguments),
            0x04 => Some(Status::ResponseOverflow),
            0x05 => Some(Status::SignatureMismatch),
            0x06 => Some(Status::Malformed),
            _ => None,
        }
    }
}

impl From<&DispatchError> for Status {
    fn from(e: &DispatchError) -> Self {
        match e {
            DispatchError::UnknownInstance(_) => Status::UnknownInstance,
            DispatchError::UnknownFunction(_) => Status::UnknownFunction,
            DispatchError::BadArguments(_) | DispatchError::TrailingArguments(_) => Status::BadArguments,
            DispatchError::SignatureMismatch { .. } => Status::SignatureMismatch,
            DispatchError::ResponseOverflow(_) => Status::ResponseOverflow,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Codec for Status {
    fn encode(&self, out: &mut [u8]) -> wirepack::Result<usize> {
        (*self as u8).encode(out)
    }

    fn decode(input: &[u8]) -> wirepack::Result<(Self, usize)> {
        let (b, n) = u8::decode(input)?;
        let status = Status::from_u8(b).ok_or(Error::InvalidDiscriminant(b))?;
        Ok((status, n))
    }
}

/// Size of the fixed part of a request frame.
pub const REQUEST_HEADER_LEN: usize = 4 + 4 + LEN_PREFIX;
/// Size of the fixed part of a response frame.
pub const RESPONSE_HEADER_LEN: usize = 1 + LEN_PREFIX;

/// An outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    pub target: CallIdentifier,
    pub params: Vec<u8>,
}

impl_codec_struct!(RequestFrame { target, params });

impl RequestFrame {
    pub fn new(target: CallIdentifier, params: Vec<u8>) -> Self {
        Self { target, params }
    }

    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_LEN + self.params.len()
    }

    pub fn to_bytes(&self) -> wirepack::Result<Vec<u8>> {
        wirepack::encode_to_vec(self, self.encoded_len())
    }

    pub fn from_bytes(bytes: &[u8]) -> wirepack::Result<Self> {
        wirepack::decode_exact(bytes)
    }
}

/// The answer to a call. `payload` is the encoded result when `status` is `Ok`
/// and empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub status: Status,
    pub payload: Vec<u8>,
}

impl_codec_struct!(ResponseFrame { status, payload });

impl ResponseFrame {
    pub fn ok(payload: Vec<u8>) -> Self {
        Self { status: Status::Ok, payload }
    }

    pub fn failure(status: Status) -> Self {
        Self { status, payload: Vec::new() }
    }

    pub fn encoded_len(&self) -> usize {
        RESPONSE_HEADER_LEN + self.payload.len()
    }

    pub fn to_bytes(&self) -> wirepack::Result<Vec<u8>> {
        wirepack::encode_to_vec(self, self.encoded_len())
    }

    pub fn from_bytes(bytes: &[u8]) -> wirepack::Result<Self> {
        wirepack::decode_exact(bytes)
    }
}
