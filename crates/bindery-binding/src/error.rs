//! Errors raised while dispatching aspects and applying them to components.

use bindery_reflect::ReflectError;
use thiserror::Error;

/// Class name reported when a dispatcher has no bound object.
pub const NO_BOUND_OBJECT: &str = "<no bound object>";

/// Failure of a [`PropertyDispatcher`](crate::PropertyDispatcher) operation.
///
/// These are configuration errors: a dispatcher chain that cannot answer an
/// aspect was set up for a model that does not provide it.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("cannot read aspect '{aspect}' of property '{property}' on {class}: no dispatcher resolves it")]
    Unresolved {
        aspect: String,
        property: String,
        class: &'static str,
    },
    #[error("cannot write aspect '{aspect}' of property '{property}' on {class}: no dispatcher accepts it")]
    NotWritable {
        aspect: String,
        property: String,
        class: &'static str,
    },
    #[error("cannot determine the value type of property '{property}' on {class}")]
    UnknownValueType {
        property: String,
        class: &'static str,
    },
    /// A property behavior forbids writing the property.
    #[error("writing property '{property}' on {class} is denied by a property behavior")]
    PushDenied {
        property: String,
        class: &'static str,
    },
    #[error("accessor for '{property}' on {class} failed")]
    Accessor {
        property: String,
        class: &'static str,
        #[source]
        source: ReflectError,
    },
}

/// Failure while creating, updating or removing bindings.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// An aspect could not be applied to its component.
    #[error("error applying aspect '{aspect}' of property '{property}' on {class}")]
    AspectApplication {
        aspect: String,
        class: &'static str,
        property: String,
        #[source]
        source: Box<BindingError>,
    },
    /// A member of a composite aspect definition failed.
    #[error("aspect definition '{member}' failed: {source}")]
    CompositeMember {
        member: String,
        #[source]
        source: Box<BindingError>,
    },
    /// The component lacks the capability an aspect needs.
    #[error("aspect '{aspect}' requires a component that is {expected}")]
    ComponentMismatch {
        expected: &'static str,
        aspect: String,
    },
    /// An aspect value has an unexpected type.
    #[error("aspect '{aspect}' expected a value of type {expected}, found {found}")]
    ValueType {
        aspect: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The value type of an enum-valued property has no registered constants.
    #[error("property '{property}' has type {value_type}, which has no registered enum values")]
    NoEnumValues {
        property: String,
        value_type: &'static str,
    },
    /// Creating the binding of a container child failed.
    #[error("cannot bind child {index} of container for {class}")]
    ContainerChild {
        index: usize,
        class: &'static str,
        #[source]
        source: Box<BindingError>,
    },
}

impl BindingError {
    /// The innermost [`DispatchError`] in the chain of causes, if any.
    #[must_use]
    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match self {
            Self::Dispatch(err) => Some(err),
            Self::AspectApplication { source, .. }
            | Self::CompositeMember { source, .. }
            | Self::ContainerChild { source, .. } => source.dispatch_error(),
            Self::ComponentMismatch { .. } | Self::ValueType { .. } | Self::NoEnumValues { .. } => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_is_found_through_wrappers() {
        let err = BindingError::CompositeMember {
            member: "enabled".into(),
            source: Box::new(BindingError::AspectApplication {
                aspect: "enabled".into(),
                class: "app::Form",
                property: "x".into(),
                source: Box::new(BindingError::from(DispatchError::Unresolved {
                    aspect: "enabled".into(),
                    property: "x".into(),
                    class: "app::Form",
                })),
            }),
        };
        assert!(matches!(
            err.dispatch_error(),
            Some(DispatchError::Unresolved { property, .. }) if property == "x"
        ));
    }

    #[test]
    fn messages_name_property_and_class() {
        let err = DispatchError::Unresolved {
            aspect: "enabled".into(),
            property: "x".into(),
            class: "app::Form",
        };
        let text = err.to_string();
        assert!(text.contains("'x'"));
        assert!(text.contains("app::Form"));
    }

    #[test]
    fn composite_message_includes_the_member_cause() {
        let err = BindingError::CompositeMember {
            member: "label".into(),
            source: Box::new(BindingError::ComponentMismatch {
                expected: "a field",
                aspect: "value".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "aspect definition 'label' failed: aspect 'value' requires a component that is a field"
        );
    }
}
