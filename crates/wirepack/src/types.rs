//! Core types for the wirepack format

/// Wirepack serialization and deserialization errors.
///
/// A failed operation never reports a consumed length; the `needed`/`available`
/// pairs describe the shortfall only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Output capacity is smaller than the encoding.
    BufferFull { needed: usize, available: usize },
    /// Input ended before the value was complete.
    UnexpectedEnd { needed: usize, available: usize },
    /// String data is not valid UTF-8.
    InvalidUtf8,
    /// Decoded `u32` is not a Unicode scalar value.
    InvalidChar(u32),
    /// Discriminant byte does not name a known case (bool, Option, Result, ...).
    InvalidDiscriminant(u8),
    /// Length does not fit the wire's `u32` prefix, or the platform's `usize`.
    LengthOverflow(usize),
    /// Input had bytes left over after a value that should have consumed all of it.
    TrailingBytes(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BufferFull { needed, available } => {
                write!(f, "Buffer full: needed {} bytes, {} available", needed, available)
            }
            Error::UnexpectedEnd { needed, available } => {
                write!(f, "Unexpected end: needed {} bytes, {} available", needed, available)
            }
            Error::InvalidUtf8 => write!(f, "Invalid UTF-8 in string"),
            Error::InvalidChar(v) => write!(f, "Invalid char scalar: {:#x}", v),
            Error::InvalidDiscriminant(b) => write!(f, "Invalid discriminant byte: {:#04x}", b),
            Error::LengthOverflow(len) => write!(f, "Length {} does not fit the wire format", len),
            Error::TrailingBytes(n) => write!(f, "{} trailing bytes after value", n),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for wirepack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Size of the length prefix carried by blobs and sequences.
pub const LEN_PREFIX: usize = 4;
