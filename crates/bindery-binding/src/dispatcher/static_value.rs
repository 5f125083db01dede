use bindery_reflect::{BoundObject, Value, ValueType, capitalize};

use crate::aspect::Aspect;
use crate::dispatcher::PropertyDispatcher;
use crate::error::DispatchError;

/// Answers static aspects without touching the model.
///
/// A static label of `""` is derived from the property name.
pub struct StaticValueDispatcher {
    next: Box<dyn PropertyDispatcher>,
}

impl StaticValueDispatcher {
    #[must_use]
    pub fn new(next: Box<dyn PropertyDispatcher>) -> Self {
        Self { next }
    }
}

impl PropertyDispatcher for StaticValueDispatcher {
    fn property(&self) -> &str {
        self.next.property()
    }

    fn bound_object(&self) -> Option<BoundObject> {
        self.next.bound_object()
    }

    fn value_type(&self) -> Result<ValueType, DispatchError> {
        self.next.value_type()
    }

    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError> {
        let Some(value) = aspect.value() else {
            return self.next.pull(aspect);
        };
        if aspect.name() == Aspect::LABEL && value.downcast_ref::<String>().is_some_and(String::is_empty) {
            return Ok(Value::new(capitalize(self.property())));
        }
        Ok(value.clone())
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        self.next.push(aspect)
    }

    fn is_push_available(&self, aspect: &Aspect) -> bool {
        self.next.is_push_available(aspect)
    }
}
