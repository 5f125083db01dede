use bindery_reflect::{BoundObject, PropertyAccessor, Value, ValueType};

use crate::aspect::Aspect;
use crate::dispatcher::{PropertyDispatcher, accessor_error, member_name, read_member, write_member};
use crate::error::DispatchError;

/// Resolves aspects against the presentation model object by name.
///
/// The value aspect maps to the property itself, any other aspect to
/// `{property}{Aspect}`: `enabled` of `address` reads `isAddressEnabled`.
/// A push with a value writes through the setter; a push without a value
/// invokes the method named like the member.
pub struct ReflectionDispatcher {
    object: BoundObject,
    property: String,
    next: Box<dyn PropertyDispatcher>,
}

impl ReflectionDispatcher {
    #[must_use]
    pub fn new(
        object: BoundObject,
        property: impl Into<String>,
        next: Box<dyn PropertyDispatcher>,
    ) -> Self {
        Self {
            object,
            property: property.into(),
            next,
        }
    }
}

impl PropertyDispatcher for ReflectionDispatcher {
    fn property(&self) -> &str {
        &self.property
    }

    fn bound_object(&self) -> Option<BoundObject> {
        Some(self.object.clone())
    }

    fn value_type(&self) -> Result<ValueType, DispatchError> {
        let accessor = PropertyAccessor::for_object(&self.object, &self.property);
        if accessor.can_read() {
            accessor
                .value_type()
                .map_err(|err| accessor_error(&self.object, &self.property, err))
        } else {
            self.next.value_type()
        }
    }

    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError> {
        if aspect.name() == Aspect::DERIVED_READ_ONLY {
            let accessor = PropertyAccessor::for_object(&self.object, &self.property);
            if accessor.can_read() {
                return Ok(Value::new(!accessor.can_write()));
            }
            return self.next.pull(aspect);
        }
        let member = member_name(&self.property, aspect);
        match read_member(&self.object, &member) {
            Some(result) => result,
            None => self.next.pull(aspect),
        }
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        let member = member_name(&self.property, aspect);
        if let Some(value) = aspect.value() {
            return match write_member(&self.object, &member, value) {
                Some(result) => result,
                None => self.next.push(aspect),
            };
        }
        let accessor = PropertyAccessor::for_object(&self.object, &member);
        if accessor.can_invoke() {
            accessor
                .invoke(&self.object)
                .map(drop)
                .map_err(|err| accessor_error(&self.object, &member, err))
        } else {
            self.next.push(aspect)
        }
    }

    fn is_push_available(&self, aspect: &Aspect) -> bool {
        let accessor = PropertyAccessor::for_object(&self.object, &member_name(&self.property, aspect));
        let available = if aspect.is_value_present() {
            accessor.can_write()
        } else {
            accessor.can_invoke()
        };
        available || self.next.is_push_available(aspect)
    }
}
