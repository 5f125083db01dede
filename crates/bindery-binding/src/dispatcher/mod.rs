//! Property dispatchers: resolving aspects of one bound property.
//!
//! A dispatcher is bound to exactly one `(object, property)` pair. The chain
//! built by [`PropertyDispatcherFactory`] is, outermost first:
//!
//! ```text
//! BehaviorDependent -> StaticValue -> Reflection(pmo) -> [ModelObject] -> Terminal
//! ```
//!
//! Each link handles the aspects it recognizes and delegates everything else
//! to the next one. The terminal link fails, naming aspect, property and
//! class.
//!
//! # Invariants
//!
//! 1. `pull`, `value_type` and `is_push_available` never modify the model.
//! 2. `push` performs at most one write or invocation.
//! 3. A dispatcher never changes its bound object; a new object needs a new chain.

pub mod behavior;
pub mod factory;
pub mod model_object;
pub mod reflection;
pub mod static_value;
pub mod terminal;

pub use behavior::BehaviorDependentDispatcher;
pub use factory::{ModelBinding, PropertyDispatcherFactory};
pub use model_object::ModelObjectDispatcher;
pub use reflection::ReflectionDispatcher;
pub use static_value::StaticValueDispatcher;
pub use terminal::TerminalDispatcher;

use bindery_reflect::{BoundObject, PropertyAccessor, ReflectError, Value, ValueType};

use crate::aspect::Aspect;
use crate::error::{DispatchError, NO_BOUND_OBJECT};

/// Resolves and writes the aspects of one bound property.
pub trait PropertyDispatcher {
    /// The bound property; empty when the whole object is bound.
    fn property(&self) -> &str;

    /// The object aspects are resolved against, if any.
    fn bound_object(&self) -> Option<BoundObject>;

    /// Declared type of the property's value.
    fn value_type(&self) -> Result<ValueType, DispatchError>;

    /// Current value of `aspect`.
    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError>;

    /// Write the aspect's value, or invoke the aspect if it has none.
    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError>;

    /// Whether [`push`](Self::push) of `aspect` would be accepted.
    fn is_push_available(&self, aspect: &Aspect) -> bool;
}

/// Class name of a dispatcher's bound object for diagnostics.
pub(crate) fn class_name(dispatcher: &dyn PropertyDispatcher) -> &'static str {
    dispatcher
        .bound_object()
        .map_or(NO_BOUND_OBJECT, |object| object.type_name())
}

/// Name of the model member backing `aspect` of `property`.
pub(crate) fn member_name(property: &str, aspect: &Aspect) -> String {
    match (property.is_empty(), aspect.is_value_aspect()) {
        (_, true) => property.to_owned(),
        (true, false) => aspect.name().to_owned(),
        (false, false) => format!("{property}{}", bindery_reflect::capitalize(aspect.name())),
    }
}

pub(crate) fn accessor_error(object: &BoundObject, member: &str, source: ReflectError) -> DispatchError {
    DispatchError::Accessor {
        property: member.to_owned(),
        class: object.type_name(),
        source,
    }
}

/// Read `member` of `object` if it is readable.
pub(crate) fn read_member(object: &BoundObject, member: &str) -> Option<Result<Value, DispatchError>> {
    let accessor = PropertyAccessor::for_object(object, member);
    accessor.can_read().then(|| {
        accessor
            .get_property_value(object)
            .map_err(|err| accessor_error(object, member, err))
    })
}

/// Write `member` of `object` if it is writable; hands the value back otherwise.
pub(crate) fn write_member(
    object: &BoundObject,
    member: &str,
    value: &Value,
) -> Option<Result<(), DispatchError>> {
    let accessor = PropertyAccessor::for_object(object, member);
    accessor.can_write().then(|| {
        accessor
            .set_property_value(object, value.clone())
            .map_err(|err| accessor_error(object, member, err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_names() {
        assert_eq!(member_name("address", &Aspect::value_aspect()), "address");
        assert_eq!(member_name("address", &Aspect::of(Aspect::ENABLED)), "addressEnabled");
        assert_eq!(member_name("", &Aspect::of(Aspect::VISIBLE)), "visible");
        assert_eq!(member_name("x", &Aspect::of(Aspect::TOOLTIP)), "xToolTip");
    }
}
