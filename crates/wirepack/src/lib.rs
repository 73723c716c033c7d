//! # Wirepack
//!
//! A small, bounded, schema-by-convention binary codec.
//!
//! ## Philosophy
//!
//! - **Untagged**: The wire carries values only. No type tags, no field names.
//!   Both ends agree on the schema out-of-band (for RPC, via the exported signature).
//! - **Bounded**: Every `encode` writes into a caller-owned slice whose length is the
//!   capacity; every `decode` reads from a slice whose length is what is available.
//!   Nothing is ever read or written past those bounds.
//! - **Open**: A type joins the registry by implementing [`Codec`]. Existing codecs
//!   never change to accommodate new ones.
//!
//! ## Format
//!
//! - **Scalars**: `[Data: N]`, fixed width, Little-Endian.
//! - **Blobs and sequences**: `[Len: 4b][Items...]`
//! - **Option / Result**: `[Discriminant: 1b][Payload?]`
//! - **Tuples, arrays, structs**: concatenation of the fields in declared order.

mod macros;

pub mod types;
pub mod codec;
pub mod cursor;
pub mod aggregate;

pub use types::Error;
pub use types::Result;

pub use codec::Codec;
pub use codec::encode_to_vec;
pub use codec::decode_exact;

pub use cursor::ReadCursor;
pub use cursor::WriteCursor;

#[cfg(test)]
mod tests;
