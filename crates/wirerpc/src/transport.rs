//! # Transport Abstraction
//!
//! Two layers:
//!
//! - [`Link`]: moves opaque byte buffers. Knows nothing about frames or types.
//! - [`Transport`]: the call-level `Send`. Delivers a parameter set to a target and
//!   feeds the response into the caller's result slot.
//!
//! [`FramedTransport`] builds the second on top of the first. [`LocalLink`] is an
//! in-process link straight into a [`Server`].

use std::fmt;
use std::sync::Arc;

use crate::frame::RequestFrame;
use crate::frame::ResponseFrame;
use crate::frame::Status;
use crate::ids::CallIdentifier;
use crate::params::ParameterSet;
use crate::params::ResponseHandler;
use crate::server::Server;

/// Default upper bound on an encoded request frame.
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024;

/// Errors that occur below the call layer. Any of them means no usable response.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The peer is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// The request frame exceeds the transport's limit.
    PayloadTooLarge { len: usize, max: usize },
    /// The remote side answered with a failure status.
    Remote(Status),
    /// The response could not be parsed, or did not match the result type.
    Malformed(String),
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::PayloadTooLarge { len, max } => write!(f, "Payload of {} bytes exceeds limit of {}", len, max),
            Self::Remote(status) => write!(f, "Remote failure: {}", status),
            Self::Malformed(msg) => write!(f, "Malformed response: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Delivers one call and its response.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `params` to `target` and decodes the reply into `result`.
    ///
    /// # invariants
    /// - `Ok(())` only once `result` has accepted the whole response.
    /// - `Err` whenever no usable response was obtained.
    async fn send(
        &self,
        target: CallIdentifier,
        params: &ParameterSet,
        result: &mut (dyn ResponseHandler + Send),
    ) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        target: CallIdentifier,
        params: &ParameterSet,
        result: &mut (dyn ResponseHandler + Send),
    ) -> Result<()> {
        (**self).send(target, params, result).await
    }
}

/// A mechanism to send a byte buffer and receive a reply.
#[async_trait::async_trait]
pub trait Link: Send + Sync + 'static {
    /// Sends a payload and waits for the response bytes.
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// A [`Transport`] that frames calls onto a [`Link`].
pub struct FramedTransport<L> {
    link: L,
    max_frame_len: usize,
}

impl<L: Link> FramedTransport<L> {
    pub fn new(link: L) -> Self {
        Self { link, max_frame_len: DEFAULT_MAX_FRAME_LEN }
    }

    pub fn with_max_frame_len(mut self, max: usize) -> Self {
        self.max_frame_len = max;
        self
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}

#[async_trait::async_trait]
impl<L: Link> Transport for FramedTransport<L> {
    async fn send(
        &self,
        target: CallIdentifier,
        params: &ParameterSet,
        result: &mut (dyn ResponseHandler + Send),
    ) -> Result<()> {
        let request = RequestFrame::new(target, params.as_bytes().to_vec());
        let len = request.encoded_len();
        if len > self.max_frame_len {
            return Err(TransportError::PayloadTooLarge { len, max: self.max_frame_len });
        }
        let payload = request.to_bytes().map_err(|e| TransportError::Io(e.to_string()))?;

        let reply = self.link.call(&payload).await?;
        let response = ResponseFrame::from_bytes(&reply)
            .map_err(|e| TransportError::Malformed(format!("response frame: {}", e)))?;

        if response.status != Status::Ok {
            return Err(TransportError::Remote(response.status));
        }

        let consumed = result
            .handle_response(&response.payload)
            .map_err(|e| TransportError::Malformed(format!("result: {}", e)))?;
        if consumed != response.payload.len() {
            return Err(TransportError::Malformed(format!(
                "{} bytes after the result",
                response.payload.len() - consumed
            )));
        }
        Ok(())
    }
}

/// An in-process link that hands frames straight to a [`Server`].
#[derive(Debug, Clone)]
pub struct LocalLink {
    server: Arc<Server>,
}

impl LocalLink {
    pub fn new(server: Arc<Server>) -> Self {
        Self { server }
    }
}

#[async_trait::async_trait]
impl Link for LocalLink {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        Ok(self.server.handle_frame(payload))
    }
}

/// A framed transport over a [`LocalLink`].
pub fn local(server: Arc<Server>) -> FramedTransport<LocalLink> {
    FramedTransport::new(LocalLink::new(server))
}
