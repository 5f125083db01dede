use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::{ComponentWrapper, WrapperType};
use crate::definition::{AspectDefinition, EnabledAspectDefinition, EnabledType, UiUpdater, typed_updater};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequiredType {
    #[default]
    NotRequired,
    Required,
    /// Required exactly when the property is enabled.
    RequiredIfEnabled,
    /// Read from `is{Property}Required`.
    Dynamic,
}

/// Marks the component's value as mandatory.
///
/// In [`RequiredType::RequiredIfEnabled`] mode the aspect *is* the enabled
/// aspect of the same property, static or dynamic as declared for enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredAspectDefinition {
    required: RequiredType,
    enabled: EnabledType,
}

impl RequiredAspectDefinition {
    pub const NAME: &'static str = Aspect::REQUIRED;

    /// `enabled` is the property's enabled mode, used by `RequiredIfEnabled`.
    #[must_use]
    pub const fn new(required: RequiredType, enabled: EnabledType) -> Self {
        Self { required, enabled }
    }

    #[must_use]
    pub fn create_aspect(&self) -> Aspect {
        match self.required {
            RequiredType::NotRequired => Aspect::with_value(Self::NAME, Value::new(false)),
            RequiredType::Required => Aspect::with_value(Self::NAME, Value::new(true)),
            RequiredType::RequiredIfEnabled => EnabledAspectDefinition::new(self.enabled).create_aspect(),
            RequiredType::Dynamic => Aspect::of(Self::NAME),
        }
    }
}

impl AspectDefinition for RequiredAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        typed_updater(self.create_aspect(), dispatcher, wrapper, |w, required: bool| {
            let component = w.component();
            let field = component
                .as_has_value()
                .ok_or_else(|| BindingError::ComponentMismatch {
                    expected: "a value holder",
                    aspect: Self::NAME.to_owned(),
                })?;
            field.set_required(required);
            Ok(())
        })
    }

    fn supports(&self, wrapper_type: WrapperType) -> bool {
        wrapper_type.is_assignable_to(WrapperType::Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_if_enabled_is_the_enabled_aspect() {
        let dynamic = RequiredAspectDefinition::new(RequiredType::RequiredIfEnabled, EnabledType::Dynamic)
            .create_aspect();
        assert_eq!(dynamic.name(), Aspect::ENABLED);
        assert!(!dynamic.is_value_present());

        let fixed = RequiredAspectDefinition::new(RequiredType::RequiredIfEnabled, EnabledType::Disabled)
            .create_aspect();
        assert_eq!(fixed.name(), Aspect::ENABLED);
        assert!(fixed.value().is_some_and(|v| v.eq_to(&false)));
    }

    #[test]
    fn static_modes() {
        let required = RequiredAspectDefinition::new(RequiredType::Required, EnabledType::Enabled).create_aspect();
        assert_eq!(required.name(), Aspect::REQUIRED);
        assert!(required.value().is_some_and(|v| v.eq_to(&true)));
        let dynamic = RequiredAspectDefinition::new(RequiredType::Dynamic, EnabledType::Enabled).create_aspect();
        assert!(!dynamic.is_value_present());
    }
}
