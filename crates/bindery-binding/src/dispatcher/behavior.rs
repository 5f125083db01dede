use std::rc::Rc;

use bindery_reflect::{BoundObject, Value, ValueType};

use crate::aspect::Aspect;
use crate::behavior::{BehaviorProvider, all_mandatory, all_visible, all_writable};
use crate::dispatcher::PropertyDispatcher;
use crate::error::DispatchError;

/// Applies [`PropertyBehavior`](crate::PropertyBehavior)s on top of what the
/// model reports.
///
/// `visible` and `required` are `false` unless every behavior agrees; the
/// derived read-only state is `true` and pushes are refused as soon as one
/// behavior denies writing.
pub struct BehaviorDependentDispatcher {
    object: BoundObject,
    provider: Rc<dyn BehaviorProvider>,
    next: Box<dyn PropertyDispatcher>,
}

impl BehaviorDependentDispatcher {
    #[must_use]
    pub fn new(object: BoundObject, provider: Rc<dyn BehaviorProvider>, next: Box<dyn PropertyDispatcher>) -> Self {
        Self {
            object,
            provider,
            next,
        }
    }

    fn writable(&self) -> bool {
        all_writable(self.provider.as_ref(), &self.object, self.next.property())
    }
}

impl PropertyDispatcher for BehaviorDependentDispatcher {
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
        let property = self.next.property();
        match aspect.name() {
            Aspect::VISIBLE if !all_visible(self.provider.as_ref(), &self.object, property) => {
                Ok(Value::new(false))
            }
            Aspect::REQUIRED if !all_mandatory(self.provider.as_ref(), &self.object, property) => {
                Ok(Value::new(false))
            }
            Aspect::DERIVED_READ_ONLY if !self.writable() => Ok(Value::new(true)),
            _ => self.next.pull(aspect),
        }
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        if self.writable() {
            self.next.push(aspect)
        } else {
            Err(DispatchError::PushDenied {
                property: self.next.property().to_owned(),
                class: self.object.type_name(),
            })
        }
    }

    fn is_push_available(&self, aspect: &Aspect) -> bool {
        self.writable() && self.next.is_push_available(aspect)
    }
}
