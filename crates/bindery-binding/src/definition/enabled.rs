use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::ComponentWrapper;
use crate::definition::{AspectDefinition, UiUpdater, typed_updater};
use crate::dispatcher::PropertyDispatcher;

/// Declared enabled state of a property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnabledType {
    #[default]
    Enabled,
    Disabled,
    /// Read from `is{Property}Enabled`.
    Dynamic,
}

/// Enables or disables the component.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnabledAspectDefinition {
    enabled: EnabledType,
}

impl EnabledAspectDefinition {
    pub const NAME: &'static str = Aspect::ENABLED;

    #[must_use]
    pub const fn new(enabled: EnabledType) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub fn enabled_type(&self) -> EnabledType {
        self.enabled
    }

    #[must_use]
    pub fn create_aspect(&self) -> Aspect {
        match self.enabled {
            EnabledType::Enabled => Aspect::with_value(Self::NAME, Value::new(true)),
            EnabledType::Disabled => Aspect::with_value(Self::NAME, Value::new(false)),
            EnabledType::Dynamic => Aspect::of(Self::NAME),
        }
    }
}

impl AspectDefinition for EnabledAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        typed_updater(self.create_aspect(), dispatcher, wrapper, |w, enabled: bool| {
            w.set_enabled(enabled);
            Ok(())
        })
    }
}
