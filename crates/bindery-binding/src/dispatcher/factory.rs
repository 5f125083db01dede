use std::fmt;
use std::rc::Rc;

use bindery_reflect::BoundObject;

use crate::behavior::BehaviorProvider;
use crate::dispatcher::{
    BehaviorDependentDispatcher, ModelObjectDispatcher, PropertyDispatcher, ReflectionDispatcher,
    StaticValueDispatcher, TerminalDispatcher,
};

/// The model attribute a property's value is redirected to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelBinding {
    object: BoundObject,
    attribute: String,
}

impl ModelBinding {
    #[must_use]
    pub fn new(object: BoundObject, attribute: impl Into<String>) -> Self {
        Self {
            object,
            attribute: attribute.into(),
        }
    }

    #[must_use]
    pub fn object(&self) -> &BoundObject {
        &self.object
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

/// Builds dispatcher chains.
#[derive(Clone, Default)]
pub struct PropertyDispatcherFactory {
    behavior_provider: Option<Rc<dyn BehaviorProvider>>,
}

impl PropertyDispatcherFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose chains apply the provider's behaviors.
    #[must_use]
    pub fn with_behavior_provider(provider: Rc<dyn BehaviorProvider>) -> Self {
        Self {
            behavior_provider: Some(provider),
        }
    }

    /// The chain for `property` of `pmo`, optionally redirecting the value aspect.
    #[must_use]
    pub fn create(
        &self,
        pmo: &BoundObject,
        property: &str,
        model_binding: Option<&ModelBinding>,
    ) -> Rc<dyn PropertyDispatcher> {
        let mut chain: Box<dyn PropertyDispatcher> =
            Box::new(TerminalDispatcher::new(property, pmo.type_name()));
        if let Some(binding) = model_binding {
            chain = Box::new(ModelObjectDispatcher::new(
                binding.object.clone(),
                binding.attribute.clone(),
                chain,
            ));
        }
        chain = Box::new(ReflectionDispatcher::new(pmo.clone(), property, chain));
        chain = Box::new(StaticValueDispatcher::new(chain));
        if let Some(provider) = &self.behavior_provider {
            chain = Box::new(BehaviorDependentDispatcher::new(
                pmo.clone(),
                Rc::clone(provider),
                chain,
            ));
        }
        Rc::from(chain)
    }
}

impl fmt::Debug for PropertyDispatcherFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDispatcherFactory")
            .field("behaviors", &self.behavior_provider.is_some())
            .finish()
    }
}
