//! Errors raised by method tables and property accessors.

use thiserror::Error;

/// Failure inside a single registered method call.
#[derive(Debug, Error)]
pub enum MethodError {
    /// The method body itself reported an error.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
    /// The receiver is not of the type the method was registered for.
    #[error("receiver is not a {expected}")]
    ReceiverType { expected: &'static str },
    /// The argument is not of the declared parameter type.
    #[error("argument of type {found} does not match parameter type {expected}")]
    ArgumentType {
        expected: &'static str,
        found: &'static str,
    },
    /// The call shape (argument count, receiver mutability) does not match the method.
    #[error("method '{method}' {reason}")]
    Shape { method: String, reason: &'static str },
    /// The bound object is already borrowed (re-entrant access).
    #[error("{class} is already borrowed")]
    Borrowed { class: &'static str },
    /// The method disappeared from its class descriptor.
    #[error("no method '{method}' on {class}")]
    Missing { class: &'static str, method: String },
}

impl MethodError {
    /// Wrap an arbitrary error returned by a method body.
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }
}

/// Errors of [`PropertyAccessor`](crate::PropertyAccessor).
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("cannot read property '{property}' of {class}: no getter")]
    NotReadable {
        class: &'static str,
        property: String,
    },
    #[error("cannot write property '{property}' of {class}: no setter")]
    NotWritable {
        class: &'static str,
        property: String,
    },
    #[error("cannot invoke '{property}' on {class}: no such method")]
    NotInvokable {
        class: &'static str,
        property: String,
    },
    /// A `get{P}`/`is{P}` method exists but returns `()`.
    #[error("'{method}' of {class} returns () so '{property}' is not a readable property")]
    VoidGetter {
        class: &'static str,
        property: String,
        method: String,
    },
    /// The resolved method failed while being called.
    #[error("error calling accessor for property '{property}' of {class}")]
    Invocation {
        class: &'static str,
        property: String,
        #[source]
        source: MethodError,
    },
}

impl ReflectError {
    /// Property named by this error.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::NotReadable { property, .. }
            | Self::NotWritable { property, .. }
            | Self::NotInvokable { property, .. }
            | Self::VoidGetter { property, .. }
            | Self::Invocation { property, .. } => property,
        }
    }

    /// Class named by this error.
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::NotReadable { class, .. }
            | Self::NotWritable { class, .. }
            | Self::NotInvokable { class, .. }
            | Self::VoidGetter { class, .. }
            | Self::Invocation { class, .. } => class,
        }
    }
}
