#![forbid(unsafe_code)]

//! Name-based property access for bindery.
//!
//! Rust has no runtime reflection, so a presentation model type describes
//! itself once through [`Reflect`]: it registers its methods *by name*
//! (`getText`, `setText`, `isTextEnabled`, `save`, ...) into a
//! [`ClassDescriptor`]. A [`PropertyAccessor`] then resolves a property the
//! way bean conventions would: the getter is `get{P}` or `is{P}`, the setter
//! is `set{P}` taking the getter's return type, and the invoke method is the
//! property name itself.
//!
//! # Invariants
//!
//! 1. Resolution is lazy and memoized per `(type, property)`; once resolved,
//!    a read/write/invoke handle never changes.
//! 2. The accessor cache is process-wide and never evicted. Concurrent first
//!    resolutions are harmless: the loser's work is discarded.
//! 3. Missing members never fail at construction. `can_*` queries are cheap
//!    and side-effect free; the failing action reports type and property.
//! 4. Compiled and reflective invocation are observably identical.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing getter/setter/method | Not registered | `ReflectError::Not*` on use |
//! | `()`-returning getter | Registered `get{P}` returns unit | `ReflectError::VoidGetter` |
//! | Method fails | Body returned `MethodError` | `ReflectError::Invocation` |
//! | Borrow conflict | Object already mutably borrowed | `ReflectError::Invocation` |
//! | Late-bound method | Cannot be compiled | Reflective fallback, logged once |

pub mod accessor;
mod cache;
pub mod class;
pub mod config;
pub mod enums;
pub mod error;
pub mod invoke;
pub mod naming;
pub mod object;
pub mod value;

pub use accessor::PropertyAccessor;
pub use class::{ClassBuilder, ClassDescriptor, Method, Receiver, Reflect};
pub use config::InvocationMode;
pub use enums::{EnumValues, enum_constants, register_enum_values};
pub use error::{MethodError, ReflectError};
pub use invoke::{InvocationStrategy, MethodInvoker};
pub use naming::capitalize;
pub use object::{BoundObject, ObjectKey};
pub use value::{Value, ValueType};
