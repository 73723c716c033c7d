//! # Export Table
//!
//! The per-service mapping from function ids to procedures.
//!
//! ## Philosophy
//!
//! - **Schema by convention**: a service lists its methods once, in
//!   [`Service::export`]. Server and client both build their table from that list,
//!   so function ids agree without ever crossing the wire.
//! - **Frozen after build**: a table is filled completely, then shared behind an
//!   `Arc` with no way to mutate it. Concurrent dispatch only ever reads.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use wirepack::Codec;

use crate::ids::FunctionId;
use crate::ids::InstanceId;
use crate::method::Method;
use crate::method::MethodKey;
use crate::method::Signature;
use crate::procedure::Procedure;
use crate::procedure::TypedProcedure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The callable carries state (a fn pointer or capturing closure), so its type
    /// does not identify a single method.
    NotAnItem(MethodKey),
    /// More methods than function ids.
    TooManyMethods,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnItem(key) => write!(f, "'{}' is not a method item and cannot be exported", key),
            Self::TooManyMethods => write!(f, "Too many exported methods"),
        }
    }
}

impl std::error::Error for ExportError {}

pub type Result<T> = std::result::Result<T, ExportError>;

/// A type whose methods can be called remotely.
///
/// ```ignore
/// impl Service for Calculator {
///     fn export(exports: &mut Exports<Self>) -> export::Result<()> {
///         exports.export(Calculator::double)?;
///         exports.export(Calculator::add)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Service: Send + Sync + Sized + 'static {
    /// Exports every remotely callable method, always in the same order.
    fn export(exports: &mut Exports<Self>) -> Result<()>;
}

/// Function id to procedure bindings for one service type.
pub struct Exports<S> {
    procedures: Vec<Box<dyn Procedure<S>>>,
    by_method: HashMap<MethodKey, FunctionId>,
}

impl<S: 'static> Exports<S> {
    pub fn new() -> Self {
        Self { procedures: Vec::new(), by_method: HashMap::new() }
    }

    /// Registers `method` and returns its function id.
    ///
    /// Exporting the same method again returns the id it already has.
    pub fn export<A, R, M>(&mut self, method: M) -> Result<FunctionId>
    where
        A: Codec + 'static,
        R: Codec + 'static,
        M: Method<S, A, R>,
    {
        let key = MethodKey::of::<M>();
        if std::mem::size_of::<M>() != 0 {
            return Err(ExportError::NotAnItem(key));
        }
        if let Some(&id) = self.by_method.get(&key) {
            debug!(method = %key, %id, "method already exported");
            return Ok(id);
        }

        let id = u32::try_from(self.procedures.len())
            .map(FunctionId)
            .map_err(|_| ExportError::TooManyMethods)?;
        self.procedures.push(Box::new(TypedProcedure::<S, M, A, R>::new(method)));
        self.by_method.insert(key, id);
        debug!(method = %key, %id, signature = %Signature::of::<S, A, R>(), "exported");
        Ok(id)
    }

    /// The function id of an exported method, looked up by the method itself.
    pub fn lookup_method<M: 'static>(&self, method: &M) -> Option<FunctionId> {
        self.lookup(&MethodKey::of_val(method))
    }

    pub fn lookup(&self, key: &MethodKey) -> Option<FunctionId> {
        self.by_method.get(key).copied()
    }

    pub fn procedure(&self, id: FunctionId) -> Option<&dyn Procedure<S>> {
        let index = usize::try_from(id.0).ok()?;
        self.procedures.get(index).map(|p| p.as_ref())
    }

    pub fn signature(&self, id: FunctionId) -> Option<Signature> {
        self.procedure(id).map(|p| p.signature())
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Exported functions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, Signature)> + '_ {
        self.procedures
            .iter()
            .enumerate()
            .map(|(i, p)| (FunctionId(i as u32), p.signature()))
    }
}

impl<S: Service> Exports<S> {
    /// Builds the complete table for `S`.
    pub fn build() -> Result<Self> {
        let mut exports = Self::new();
        S::export(&mut exports)?;
        Ok(exports)
    }
}

impl<S: 'static> Default for Exports<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a client holds to call into one service instance.
pub struct ServiceHandle<S> {
    instance_id: InstanceId,
    exports: Arc<Exports<S>>,
}

impl<S: Service> ServiceHandle<S> {
    /// Builds a handle from the instance id alone, deriving the export table from `S`.
    pub fn remote(instance_id: InstanceId) -> Result<Self> {
        Ok(Self { instance_id, exports: Arc::new(Exports::build()?) })
    }
}

impl<S: 'static> ServiceHandle<S> {
    pub(crate) fn new(instance_id: InstanceId, exports: Arc<Exports<S>>) -> Self {
        Self { instance_id, exports }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn exports(&self) -> &Exports<S> {
        &self.exports
    }

    /// The function id `method` was exported under, if it was.
    pub fn lookup<M: 'static>(&self, method: &M) -> Option<FunctionId> {
        self.exports.lookup_method(method)
    }
}

impl<S> Clone for ServiceHandle<S> {
    fn clone(&self) -> Self {
        Self { instance_id: self.instance_id, exports: Arc::clone(&self.exports) }
    }
}

impl<S> std::fmt::Debug for ServiceHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("instance_id", &self.instance_id)
            .field("exports", &self.exports.procedures.len())
            .finish()
    }
}
