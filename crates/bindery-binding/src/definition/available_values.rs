use std::rc::Rc;

use bindery_reflect::{Value, ValueType, enum_constants};

use crate::aspect::Aspect;
use crate::component::{ComponentWrapper, WrapperType};
use crate::definition::{AspectDefinition, UiUpdater, application_error};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

/// Where the choices of a choice component come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AvailableValuesType {
    /// All registered constants of the value type, preceded by "no value".
    EnumValuesInclNull,
    /// All registered constants of the value type.
    EnumValuesExclNull,
    #[default]
    NoValues,
    /// Read from `get{Property}AvailableValues`, a `Vec<Value>` or `Vec<String>`.
    Dynamic,
}

/// Fills the items of a choice component.
///
/// Enum constants come from the registry of
/// [`register_enum_values`](bindery_reflect::register_enum_values), looked up
/// by the dispatcher's value type.
#[derive(Clone, Copy, Debug, Default)]
pub struct AvailableValuesAspectDefinition {
    values: AvailableValuesType,
}

impl AvailableValuesAspectDefinition {
    pub const NAME: &'static str = Aspect::AVAILABLE_VALUES;

    #[must_use]
    pub const fn new(values: AvailableValuesType) -> Self {
        Self { values }
    }

    /// The aspect for a property of type `value_type`.
    pub fn create_aspect(&self, property: &str, value_type: ValueType) -> Result<Aspect, BindingError> {
        let include_null = match self.values {
            AvailableValuesType::NoValues => {
                return Ok(Aspect::with_value(Self::NAME, Value::new(Vec::<Value>::new())));
            }
            AvailableValuesType::Dynamic => return Ok(Aspect::of(Self::NAME)),
            AvailableValuesType::EnumValuesInclNull => true,
            AvailableValuesType::EnumValuesExclNull => false,
        };
        let constants = enum_constants(value_type, include_null).ok_or_else(|| BindingError::NoEnumValues {
            property: property.to_owned(),
            value_type: value_type.name(),
        })?;
        Ok(Aspect::with_value(Self::NAME, Value::new(constants)))
    }

    fn needs_value_type(&self) -> bool {
        matches!(
            self.values,
            AvailableValuesType::EnumValuesInclNull | AvailableValuesType::EnumValuesExclNull
        )
    }

    fn apply(&self, dispatcher: &dyn PropertyDispatcher, wrapper: &dyn ComponentWrapper) -> Result<(), BindingError> {
        let component = wrapper.component();
        let choice = component
            .as_has_items()
            .ok_or_else(|| BindingError::ComponentMismatch {
                expected: "a choice component",
                aspect: Self::NAME.to_owned(),
            })?;
        let value_type = if self.needs_value_type() {
            dispatcher.value_type()?
        } else {
            ValueType::of::<()>()
        };
        let aspect = self.create_aspect(dispatcher.property(), value_type)?;
        let pulled = dispatcher.pull(&aspect)?;
        choice.set_items(into_items(&pulled)?);
        Ok(())
    }
}

fn into_items(value: &Value) -> Result<Vec<Value>, BindingError> {
    if let Some(items) = value.get::<Vec<Value>>() {
        return Ok(items);
    }
    if let Some(texts) = value.downcast_ref::<Vec<String>>() {
        return Ok(texts.iter().cloned().map(Value::new).collect());
    }
    Err(BindingError::ValueType {
        aspect: Aspect::AVAILABLE_VALUES.to_owned(),
        expected: std::any::type_name::<Vec<Value>>(),
        found: value.type_name(),
    })
}

impl AspectDefinition for AvailableValuesAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        let definition = *self;
        let dispatcher = Rc::clone(dispatcher);
        let wrapper = Rc::clone(wrapper);
        Box::new(move || {
            definition
                .apply(dispatcher.as_ref(), wrapper.as_ref())
                .map_err(|err| application_error(Self::NAME, dispatcher.as_ref(), err))
        })
    }

    fn supports(&self, wrapper_type: WrapperType) -> bool {
        wrapper_type.is_assignable_to(WrapperType::Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_reflect::{EnumValues, register_enum_values};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Tariff {
        Basic,
        Premium,
    }

    impl EnumValues for Tariff {
        fn values() -> Vec<Self> {
            vec![Self::Basic, Self::Premium]
        }
    }

    fn static_items(aspect: &Aspect) -> Vec<Value> {
        aspect
            .value()
            .and_then(|v| v.get::<Vec<Value>>())
            .expect("static list")
    }

    #[test]
    fn enum_modes_list_constants() {
        register_enum_values::<Tariff>();
        let incl = AvailableValuesAspectDefinition::new(AvailableValuesType::EnumValuesInclNull)
            .create_aspect("tariff", ValueType::of::<Tariff>())
            .unwrap();
        let items = static_items(&incl);
        assert_eq!(items.len(), 3);
        assert!(items[0].is_null());
        assert!(items[2].eq_to(&Tariff::Premium));

        let excl = AvailableValuesAspectDefinition::new(AvailableValuesType::EnumValuesExclNull)
            .create_aspect("tariff", ValueType::of::<Option<Tariff>>())
            .unwrap();
        let items = static_items(&excl);
        assert_eq!(items.len(), 2);
        assert!(items[0].eq_to(&Some(Tariff::Basic)));
    }

    #[test]
    fn unregistered_type_is_an_error() {
        let err = AvailableValuesAspectDefinition::new(AvailableValuesType::EnumValuesExclNull)
            .create_aspect("count", ValueType::of::<u8>())
            .unwrap_err();
        assert!(matches!(err, BindingError::NoEnumValues { ref property, .. } if property == "count"));
    }

    #[test]
    fn no_values_and_dynamic() {
        let none = AvailableValuesAspectDefinition::default()
            .create_aspect("x", ValueType::of::<u8>())
            .unwrap();
        assert!(static_items(&none).is_empty());
        let dynamic = AvailableValuesAspectDefinition::new(AvailableValuesType::Dynamic)
            .create_aspect("x", ValueType::of::<u8>())
            .unwrap();
        assert!(!dynamic.is_value_present());
    }

    #[test]
    fn string_lists_become_items() {
        let items = into_items(&Value::new(vec![String::from("a"), String::from("b")])).unwrap();
        assert!(items[1].eq_to(&String::from("b")));
        assert!(into_items(&Value::new(3_u8)).is_err());
    }
}
