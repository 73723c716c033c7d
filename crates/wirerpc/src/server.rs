//! # Server Registry & Dispatcher
//!
//! Owns the registered service instances and routes each call to its procedure.
//!
//! Uses DashMap so that instances can be registered and dispatched to from many
//! tasks without a global lock. Export tables are complete before an instance
//! becomes visible, so dispatch only ever reads them.

use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tracing::debug;
use tracing::warn;

use crate::config::ServerConfig;
use crate::export;
use crate::export::Exports;
use crate::export::Service;
use crate::export::ServiceHandle;
use crate::frame::RequestFrame;
use crate::frame::ResponseFrame;
use crate::frame::Status;
use crate::ids::CallIdentifier;
use crate::ids::FunctionId;
use crate::ids::InstanceId;
use crate::procedure::DispatchError;
use crate::procedure::Dispatched;
use crate::procedure::Result;

/// A registered instance with its service type erased.
trait Registration: Send + Sync {
    fn dispatch(&self, function_id: FunctionId, input: &[u8], output: &mut [u8]) -> Result<Dispatched>;
    fn service_name(&self) -> &'static str;
}

struct Registered<S> {
    service: S,
    exports: Arc<Exports<S>>,
}

impl<S: Service> Registration for Registered<S> {
    fn dispatch(&self, function_id: FunctionId, input: &[u8], output: &mut [u8]) -> Result<Dispatched> {
        let procedure = self
            .exports
            .procedure(function_id)
            .ok_or(DispatchError::UnknownFunction(function_id))?;
        procedure.decode_and_execute(&self.service, input, output)
    }

    fn service_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

/// The server side of the protocol.
pub struct Server {
    config: ServerConfig,
    instances: DashMap<InstanceId, Arc<dyn Registration>>,
    next_instance_id: AtomicU32,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            instances: DashMap::new(),
            next_instance_id: AtomicU32::new(1),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the export table for `S`, registers `service`, and returns the handle
    /// clients use to reach it.
    pub fn register<S: Service>(&self, service: S) -> export::Result<ServiceHandle<S>> {
        let exports = Arc::new(Exports::<S>::build()?);
        let id = InstanceId(self.next_instance_id.fetch_add(1, Ordering::Relaxed));
        let registration = Registered { service, exports: Arc::clone(&exports) };
        self.instances.insert(id, Arc::new(registration));
        debug!(instance = %id, service = std::any::type_name::<S>(), functions = exports.len(), "registered");
        Ok(ServiceHandle::new(id, exports))
    }

    /// Removes an instance. Calls already dispatched to it run to completion.
    pub fn unregister(&self, id: InstanceId) -> bool {
        let removed = self.instances.remove(&id).is_some();
        if removed {
            debug!(instance = %id, "unregistered");
        }
        removed
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Runs one call: `input` holds the encoded parameters, the encoded result is
    /// written to `output`.
    pub fn dispatch(&self, target: CallIdentifier, input: &[u8], output: &mut [u8]) -> Result<Dispatched> {
        // Clone out of the map so no shard lock is held while the method runs.
        let registration = self
            .instances
            .get(&target.instance_id())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(DispatchError::UnknownInstance(target.instance_id()))?;

        registration.dispatch(target.function_id(), input, output).inspect_err(|e| {
            warn!(%target, service = registration.service_name(), state = ?e.state(), "dispatch failed: {}", e);
        })
    }

    /// Answers one request frame with one response frame. Never fails; every
    /// problem becomes a non-`Ok` status.
    pub fn handle_frame(&self, request: &[u8]) -> Vec<u8> {
        let response = match RequestFrame::from_bytes(request) {
            Ok(frame) => self.respond(&frame),
            Err(e) => {
                warn!(len = request.len(), "malformed request frame: {}", e);
                ResponseFrame::failure(Status::Malformed)
            }
        };

        response.to_bytes().unwrap_or_else(|e| {
            // Capacity is computed from the frame itself, so this is unreachable in practice.
            warn!("failed to encode response frame: {}", e);
            vec![Status::ResponseOverflow as u8, 0, 0, 0, 0]
        })
    }

    fn respond(&self, frame: &RequestFrame) -> ResponseFrame {
        let mut output = vec![0u8; self.config.max_response_len];
        match self.dispatch(frame.target, &frame.params, &mut output) {
            Ok(done) => {
                output.truncate(done.written);
                ResponseFrame::ok(output)
            }
            Err(e) => ResponseFrame::failure(Status::from(&e)),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("instances", &self.instances.len())
            .finish()
    }
}
