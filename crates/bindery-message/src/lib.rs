#![forbid(unsafe_code)]

//! Validation messages addressed to bound object properties.
//!
//! bindery does not validate anything itself. Validation code produces a
//! [`MessageList`]; bindings pick the messages addressed to their
//! `(object, property)` pair and hand them to their component.
//!
//! # Invariants
//!
//! 1. [`Severity`] is totally ordered: `Info < Warning < Error`.
//! 2. A [`Message`] is immutable once built.
//! 3. [`MessageList`] preserves insertion order; `sort_by_severity` is stable
//!    within one severity.
//! 4. [`ObjectProperty`] equality is object identity plus property name plus index.

pub mod list;
pub mod message;
pub mod object_property;
pub mod severity;

pub use list::MessageList;
pub use message::{Marker, Message, MessageBuilder};
pub use object_property::ObjectProperty;
pub use severity::Severity;
