//! Per-type method tables.
//!
//! A [`ClassDescriptor`] is the registered "shape" of one presentation model
//! type: its methods keyed by name, each with a call shape, a return type and
//! a type-erased body. Descriptors are built once per type from
//! [`Reflect::reflect`] and shared process-wide.
//!
//! ```
//! use bindery_reflect::{ClassBuilder, ClassDescriptor, Reflect};
//!
//! struct Person {
//!     name: String,
//! }
//!
//! impl Reflect for Person {
//!     fn reflect(class: &mut ClassBuilder<Self>) {
//!         class
//!             .method("getName", |p: &Person| p.name.clone())
//!             .method1("setName", |p: &mut Person, name: String| p.name = name);
//!     }
//! }
//!
//! let class = ClassDescriptor::of::<Person>();
//! assert!(class.method("getName").is_some());
//! assert!(class.method("getAge").is_none());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock};

use ahash::AHashMap;

use crate::cache::SnapshotCache;
use crate::error::MethodError;
use crate::value::{Value, ValueType};

pub(crate) type ReadFn = dyn Fn(&dyn Any) -> Result<Value, MethodError> + Send + Sync;
pub(crate) type MutateFn = dyn Fn(&mut dyn Any) -> Result<Value, MethodError> + Send + Sync;
pub(crate) type ArgumentFn =
    dyn Fn(&mut dyn Any, Value) -> Result<Value, MethodError> + Send + Sync;

/// Type-erased method body, distinguished by call shape.
#[derive(Clone)]
pub(crate) enum MethodBody {
    /// Zero arguments, shared receiver.
    Read(Arc<ReadFn>),
    /// Zero arguments, exclusive receiver.
    Mutate(Arc<MutateFn>),
    /// One argument, exclusive receiver.
    Argument(Arc<ArgumentFn>),
}

/// How a method's receiver type is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// Registered through a typed closure over the given type.
    Typed(ValueType),
    /// Registered over `dyn Any`; the receiver type is only checked by the body.
    LateBound,
}

/// One registered method.
#[derive(Clone)]
pub struct Method {
    name: String,
    parameter: Option<ValueType>,
    returns: ValueType,
    receiver: Receiver,
    pub(crate) body: MethodBody,
}

impl Method {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter type of a one-argument method; `None` for zero arguments.
    #[must_use]
    pub fn parameter(&self) -> Option<ValueType> {
        self.parameter
    }

    #[must_use]
    pub fn returns(&self) -> ValueType {
        self.returns
    }

    #[must_use]
    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Whether the method takes no arguments.
    #[must_use]
    pub fn is_nullary(&self) -> bool {
        self.parameter.is_none()
    }

    /// Whether the method needs exclusive access to its receiver.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(self.body, MethodBody::Read(_))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("parameter", &self.parameter)
            .field("returns", &self.returns)
            .field("receiver", &self.receiver)
            .finish()
    }
}

/// Registration hook for bindable types.
pub trait Reflect: Any + Sized {
    /// Register the methods of `Self`. Called once per process.
    fn reflect(class: &mut ClassBuilder<Self>);
}

/// Collects the methods of `T` while [`Reflect::reflect`] runs.
///
/// Registering a name twice replaces the earlier method.
pub struct ClassBuilder<T> {
    methods: AHashMap<String, Method>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Any> ClassBuilder<T> {
    fn new() -> Self {
        Self {
            methods: AHashMap::new(),
            _marker: PhantomData,
        }
    }

    fn insert(
        &mut self,
        name: String,
        parameter: Option<ValueType>,
        returns: ValueType,
        receiver: Receiver,
        body: MethodBody,
    ) -> &mut Self {
        let method = Method {
            name: name.clone(),
            parameter,
            returns,
            receiver,
            body,
        };
        self.methods.insert(name, method);
        self
    }

    /// Register a zero-argument method reading from `&T`.
    pub fn method<R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&T) -> R + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_method(name, move |target| Ok(f(target)))
    }

    /// Register a fallible zero-argument method reading from `&T`.
    pub fn try_method<R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&T) -> Result<R, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Read(Arc::new(move |receiver: &dyn Any| {
            let target = receiver
                .downcast_ref::<T>()
                .ok_or_else(receiver_mismatch::<T>)?;
            f(target).map(Value::new)
        }));
        self.insert(name.into(), None, ValueType::of::<R>(), typed::<T>(), body)
    }

    /// Register a zero-argument method mutating `&mut T` (typically an action).
    pub fn method_mut<R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut T) -> R + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_method_mut(name, move |target| Ok(f(target)))
    }

    /// Register a fallible zero-argument method mutating `&mut T`.
    pub fn try_method_mut<R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut T) -> Result<R, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Mutate(Arc::new(move |receiver: &mut dyn Any| {
            let target = receiver
                .downcast_mut::<T>()
                .ok_or_else(receiver_mismatch::<T>)?;
            f(target).map(Value::new)
        }));
        self.insert(name.into(), None, ValueType::of::<R>(), typed::<T>(), body)
    }

    /// Register a one-argument method on `&mut T` (typically a setter).
    pub fn method1<A: Any + Clone, R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut T, A) -> R + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_method1(name, move |target, arg| Ok(f(target, arg)))
    }

    /// Register a fallible one-argument method on `&mut T`.
    pub fn try_method1<A: Any + Clone, R: Any>(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut T, A) -> Result<R, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Argument(Arc::new(move |receiver: &mut dyn Any, arg: Value| {
            let target = receiver
                .downcast_mut::<T>()
                .ok_or_else(receiver_mismatch::<T>)?;
            let arg = arg.get::<A>().ok_or_else(|| MethodError::ArgumentType {
                expected: std::any::type_name::<A>(),
                found: arg.type_name(),
            })?;
            f(target, arg).map(Value::new)
        }));
        self.insert(
            name.into(),
            Some(ValueType::of::<A>()),
            ValueType::of::<R>(),
            typed::<T>(),
            body,
        )
    }

    /// Register a late-bound zero-argument method over `&dyn Any`.
    ///
    /// Late-bound methods serve receivers whose layout is only known at
    /// runtime (script- or proxy-backed objects). They are never compiled
    /// into direct adapters.
    pub fn dynamic_method(
        &mut self,
        name: impl Into<String>,
        returns: ValueType,
        f: impl Fn(&dyn Any) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Read(Arc::new(f));
        self.insert(name.into(), None, returns, Receiver::LateBound, body)
    }

    /// Late-bound counterpart of [`method_mut`](Self::method_mut).
    pub fn dynamic_method_mut(
        &mut self,
        name: impl Into<String>,
        returns: ValueType,
        f: impl Fn(&mut dyn Any) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Mutate(Arc::new(f));
        self.insert(name.into(), None, returns, Receiver::LateBound, body)
    }

    /// Late-bound counterpart of [`method1`](Self::method1).
    pub fn dynamic_method1(
        &mut self,
        name: impl Into<String>,
        parameter: ValueType,
        returns: ValueType,
        f: impl Fn(&mut dyn Any, Value) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) -> &mut Self {
        let body = MethodBody::Argument(Arc::new(f));
        self.insert(name.into(), Some(parameter), returns, Receiver::LateBound, body)
    }
}

fn typed<T: Any>() -> Receiver {
    Receiver::Typed(ValueType::of::<T>())
}

fn receiver_mismatch<T: Any>() -> MethodError {
    MethodError::ReceiverType {
        expected: std::any::type_name::<T>(),
    }
}

static DESCRIPTORS: LazyLock<SnapshotCache<TypeId, ClassDescriptor>> =
    LazyLock::new(SnapshotCache::new);

/// The registered method table of one type.
pub struct ClassDescriptor {
    value_type: ValueType,
    methods: AHashMap<String, Method>,
}

impl ClassDescriptor {
    /// The shared descriptor of `T`, built on first request.
    #[must_use]
    pub fn of<T: Reflect>() -> Arc<Self> {
        DESCRIPTORS.get_or_insert_with(TypeId::of::<T>(), Self::build::<T>)
    }

    /// Build an unshared descriptor of `T`.
    #[must_use]
    pub fn build<T: Reflect>() -> Self {
        let mut builder = ClassBuilder::<T>::new();
        T::reflect(&mut builder);
        Self {
            value_type: ValueType::of::<T>(),
            methods: builder.methods,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Fully qualified name of the described type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.value_type.name()
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ClassDescriptor")
            .field("type", &self.value_type.name())
            .field("methods", &names)
            .finish()
    }
}
