//! # Procedures
//!
//! A procedure is the server-side unit for one exported method: decode the
//! parameters, recover the typed method, invoke it, encode the result.
//!
//! ## Invariants
//! - **No partial invocation**: the method runs only after every parameter decoded and
//!   the input was consumed exactly.
//! - **Signature isolation**: a `TypedProcedure<S, M, A, R>` only ever recovers an `M`.
//! - **No panics**: output overflow is reported as `ResponseOverflow`.

use std::marker::PhantomData;

use tracing::error;
use tracing::trace;

use wirepack::Codec;

use crate::ids::FunctionId;
use crate::ids::InstanceId;
use crate::method::Method;
use crate::method::MethodPtr;
use crate::method::Signature;

/// Progress of a single call through its procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Received,
    Decoded,
    Invoked,
    Encoded,
    Done,
}

/// Why a dispatch stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No service is registered under the instance id.
    UnknownInstance(InstanceId),
    /// The service exports nothing under the function id.
    UnknownFunction(FunctionId),
    /// The parameters did not decode.
    BadArguments(wirepack::Error),
    /// The parameters decoded but bytes were left over.
    TrailingArguments(usize),
    /// The erased method was not of the type this procedure was built for.
    SignatureMismatch { expected: Signature, found: Signature },
    /// The result did not fit in the output buffer.
    ResponseOverflow(wirepack::Error),
}

impl DispatchError {
    /// The last state reached before failing.
    pub fn state(&self) -> CallState {
        match self {
            Self::UnknownInstance(_)
            | Self::UnknownFunction(_)
            | Self::BadArguments(_)
            | Self::TrailingArguments(_) => CallState::Received,
            Self::SignatureMismatch { .. } => CallState::Decoded,
            Self::ResponseOverflow(_) => CallState::Invoked,
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownInstance(id) => write!(f, "Unknown instance: {}", id),
            Self::UnknownFunction(id) => write!(f, "Unknown function: {}", id),
            Self::BadArguments(e) => write!(f, "Bad arguments: {}", e),
            Self::TrailingArguments(n) => write!(f, "{} bytes after the last argument", n),
            Self::SignatureMismatch { expected, found } => {
                write!(f, "Signature mismatch: expected {}, found {}", expected, found)
            }
            Self::ResponseOverflow(e) => write!(f, "Response overflow: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadArguments(e) | Self::ResponseOverflow(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Byte counts of a completed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// Parameter bytes read from the input.
    pub consumed: usize,
    /// Result bytes written to the output.
    pub written: usize,
}

/// One exported method of service `S`, with its type erased.
pub trait Procedure<S>: Send + Sync {
    /// Runs the full decode, invoke, encode sequence against `service`.
    fn decode_and_execute(&self, service: &S, input: &[u8], output: &mut [u8]) -> Result<Dispatched>;

    /// The method shape this procedure was built for.
    fn signature(&self) -> Signature;

    /// The erased method this procedure dispatches to.
    fn method(&self) -> &MethodPtr;
}

/// The procedure variant for one concrete method type `M: Fn(&S, A) -> R`.
///
/// Each distinct method monomorphizes its own variant; no variant ever handles
/// another's pointer.
pub struct TypedProcedure<S, M, A, R> {
    method: MethodPtr,
    _marker: PhantomData<fn(&S, A, M) -> R>,
}

impl<S, M, A, R> TypedProcedure<S, M, A, R>
where
    S: 'static,
    A: Codec + 'static,
    R: Codec + 'static,
    M: Method<S, A, R>,
{
    pub fn new(method: M) -> Self {
        Self { method: MethodPtr::from::<S, A, R, M>(method), _marker: PhantomData }
    }

    /// Binds an already-erased pointer. Fails if it does not hold an `M`.
    pub fn from_erased(method: MethodPtr) -> Result<Self> {
        if method.to::<M>().is_none() {
            return Err(DispatchError::SignatureMismatch {
                expected: Signature::of::<S, A, R>(),
                found: method.signature(),
            });
        }
        Ok(Self { method, _marker: PhantomData })
    }
}

impl<S, M, A, R> Procedure<S> for TypedProcedure<S, M, A, R>
where
    S: 'static,
    A: Codec + 'static,
    R: Codec + 'static,
    M: Method<S, A, R>,
{
    fn decode_and_execute(&self, service: &S, input: &[u8], output: &mut [u8]) -> Result<Dispatched> {
        trace!(state = ?CallState::Received, len = input.len(), method = %self.method.key());

        let (args, consumed) = A::decode(input).map_err(DispatchError::BadArguments)?;
        if consumed != input.len() {
            return Err(DispatchError::TrailingArguments(input.len() - consumed));
        }
        trace!(state = ?CallState::Decoded, consumed);

        let method = self.method.to::<M>().ok_or(DispatchError::SignatureMismatch {
            expected: Signature::of::<S, A, R>(),
            found: self.method.signature(),
        })?;
        let result = method.invoke(service, args);
        trace!(state = ?CallState::Invoked);

        let written = result.encode(output).map_err(|e| {
            error!(method = %self.method.key(), capacity = output.len(), "response does not fit: {}", e);
            DispatchError::ResponseOverflow(e)
        })?;
        trace!(state = ?CallState::Encoded, written);

        trace!(state = ?CallState::Done);
        Ok(Dispatched { consumed, written })
    }

    fn signature(&self) -> Signature {
        Signature::of::<S, A, R>()
    }

    fn method(&self) -> &MethodPtr {
        &self.method
    }
}
