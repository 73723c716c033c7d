//! # Erased Method Pointers
//!
//! A service method is any zero-sized callable `Fn(&S, A1, .., An) -> R`, which in
//! practice means a path to a method item such as `Calculator::double`. Every such
//! item has its own type, so its `TypeId` names the method exactly.
//!
//! [`MethodPtr`] erases the callable behind `dyn Any` and keeps two descriptors:
//! the [`MethodKey`] (which method) and the [`Signature`] (its `(S, Args) -> R`
//! shape). Recovering the typed callable is a checked downcast. A request for any
//! other type yields `None`; nothing is ever reinterpreted.

use std::any::Any;
use std::any::TypeId;
use std::hash::Hash;
use std::hash::Hasher;

/// A callable that can be exported as a remote procedure of service `S`.
///
/// `A` is the tuple of parameter types and `R` the return type. Implemented for
/// every `Fn(&S, A1, .., An) -> R` with up to eight parameters.
pub trait Method<S, A, R>: Copy + Send + Sync + 'static {
    /// Calls the method on `service`, spreading the argument tuple.
    fn invoke(self, service: &S, args: A) -> R;
}

macro_rules! impl_method {
    ($($arg:ident),*) => {
        impl<S, R, F, $($arg),*> Method<S, ($($arg,)*), R> for F
        where
            F: Fn(&S, $($arg),*) -> R + Copy + Send + Sync + 'static,
        {
            #[allow(non_snake_case)]
            fn invoke(self, service: &S, args: ($($arg,)*)) -> R {
                let ($($arg,)*) = args;
                self(service, $($arg),*)
            }
        }
    };
}

impl_method!();
impl_method!(A1);
impl_method!(A1, A2);
impl_method!(A1, A2, A3);
impl_method!(A1, A2, A3, A4);
impl_method!(A1, A2, A3, A4, A5);
impl_method!(A1, A2, A3, A4, A5, A6);
impl_method!(A1, A2, A3, A4, A5, A6, A7);
impl_method!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Descriptor of a method shape: `fn(&S, A) -> R`.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    id: TypeId,
    name: &'static str,
}

impl Signature {
    pub fn of<S: 'static, A: 'static, R: 'static>() -> Self {
        Self {
            id: TypeId::of::<fn(&S, A) -> R>(),
            name: std::any::type_name::<fn(&S, A) -> R>(),
        }
    }

    /// Human-readable type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of one exported callable.
#[derive(Clone, Copy, Debug)]
pub struct MethodKey {
    id: TypeId,
    name: &'static str,
}

impl MethodKey {
    pub fn of<M: 'static>() -> Self {
        Self { id: TypeId::of::<M>(), name: std::any::type_name::<M>() }
    }

    /// The key of `method`, inferring its type.
    pub fn of_val<M: 'static>(_method: &M) -> Self {
        Self::of::<M>()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for MethodKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MethodKey {}

impl Hash for MethodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for MethodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased method together with the descriptors needed to recover it.
pub struct MethodPtr {
    key: MethodKey,
    signature: Signature,
    callable: Box<dyn Any + Send + Sync>,
}

impl MethodPtr {
    /// Erases a typed method.
    pub fn from<S, A, R, M>(method: M) -> Self
    where
        S: 'static,
        A: 'static,
        R: 'static,
        M: Method<S, A, R>,
    {
        Self {
            key: MethodKey::of::<M>(),
            signature: Signature::of::<S, A, R>(),
            callable: Box::new(method),
        }
    }

    /// Recovers the typed method, or `None` if `M` is not the erased type.
    pub fn to<M: 'static + Copy>(&self) -> Option<M> {
        self.callable.downcast_ref::<M>().copied()
    }

    pub fn key(&self) -> MethodKey {
        self.key
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }
}

impl std::fmt::Debug for MethodPtr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodPtr")
            .field("key", &self.key)
            .field("signature", &self.signature)
            .finish()
    }
}
