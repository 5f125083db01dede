use bindery_reflect::{BoundObject, Value, ValueType};

use crate::aspect::Aspect;
use crate::dispatcher::PropertyDispatcher;
use crate::error::DispatchError;

/// End of every dispatcher chain: nothing resolved the request.
#[derive(Debug)]
pub struct TerminalDispatcher {
    property: String,
    class: &'static str,
}

impl TerminalDispatcher {
    /// `class` names the bound object's type in error messages.
    #[must_use]
    pub fn new(property: impl Into<String>, class: &'static str) -> Self {
        Self {
            property: property.into(),
            class,
        }
    }
}

impl PropertyDispatcher for TerminalDispatcher {
    fn property(&self) -> &str {
        &self.property
    }

    fn bound_object(&self) -> Option<BoundObject> {
        None
    }

    fn value_type(&self) -> Result<ValueType, DispatchError> {
        Err(DispatchError::UnknownValueType {
            property: self.property.clone(),
            class: self.class,
        })
    }

    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError> {
        Err(DispatchError::Unresolved {
            aspect: aspect.display_name().to_owned(),
            property: self.property.clone(),
            class: self.class,
        })
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        Err(DispatchError::NotWritable {
            aspect: aspect.display_name().to_owned(),
            property: self.property.clone(),
            class: self.class,
        })
    }

    fn is_push_available(&self, _aspect: &Aspect) -> bool {
        false
    }
}
