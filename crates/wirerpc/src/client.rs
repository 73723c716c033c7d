//! # Call Binder
//!
//! Turns `client.call(&handle, Service::method, (args..))` into a transport send.
//!
//! The client is stateless apart from its configuration: identifiers come from the
//! handle, delivery from the transport. A [`ResultSlot`] only ever leaves the client
//! filled; on every failure path it is dropped before returning.

use std::fmt;

use tracing::debug;
use tracing::warn;

use wirepack::Codec;

use crate::config::ClientConfig;
use crate::export::ServiceHandle;
use crate::ids::CallIdentifier;
use crate::method::Method;
use crate::params::ParameterSet;
use crate::params::ResultSlot;
use crate::transport::Transport;
use crate::transport::TransportError;

/// Why a call produced no result.
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// The method is not in the service's export table.
    NotExported(&'static str),
    /// The arguments did not fit the parameter buffer.
    Encode(wirepack::Error),
    /// The transport obtained no usable response.
    Transport(TransportError),
    /// The transport reported success without filling the slot.
    EmptyResponse,
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotExported(name) => write!(f, "Method not exported: {}", name),
            Self::Encode(e) => write!(f, "Failed to encode parameters: {}", e),
            Self::Transport(e) => write!(f, "Transport failure: {}", e),
            Self::EmptyResponse => write!(f, "Transport returned without a result"),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wirepack::Error> for CallError {
    fn from(e: wirepack::Error) -> Self { Self::Encode(e) }
}

impl From<TransportError> for CallError {
    fn from(e: TransportError) -> Self { Self::Transport(e) }
}

pub type Result<T> = std::result::Result<T, CallError>;

/// The client side of the protocol.
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, config: ClientConfig::default() }
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `method` on the remote instance behind `service`.
    ///
    /// Returns `None` if the method was never exported, the arguments did not fit,
    /// or the transport got no usable response. The reason is logged.
    pub async fn call<S, M, A, R>(&self, service: &ServiceHandle<S>, method: M, args: A) -> Option<ResultSlot<R>>
    where
        S: 'static,
        M: Method<S, A, R>,
        A: Codec + Send,
        R: Codec + Send,
    {
        match self.try_call(service, method, args).await {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(instance = %service.instance_id(), method = std::any::type_name::<M>(), "call failed: {}", e);
                None
            }
        }
    }

    /// Same as [`Client::call`], keeping the reason for a failure.
    pub async fn try_call<S, M, A, R>(&self, service: &ServiceHandle<S>, method: M, args: A) -> Result<ResultSlot<R>>
    where
        S: 'static,
        M: Method<S, A, R>,
        A: Codec + Send,
        R: Codec + Send,
    {
        let instance_id = service.instance_id();
        let function_id = service
            .lookup(&method)
            .ok_or(CallError::NotExported(std::any::type_name::<M>()))?;
        let target = CallIdentifier::new(instance_id, function_id);

        let params = ParameterSet::encode(&args, self.config.max_params_len)?;
        let mut slot = ResultSlot::<R>::new();
        debug!(%target, params = params.len(), "sending call");

        // On error `slot` is dropped here, with whatever it may hold.
        self.transport.send(target, &params, &mut slot).await?;

        if !slot.is_filled() {
            return Err(CallError::EmptyResponse);
        }
        Ok(slot)
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish()
    }
}
