use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::{ComponentWrapper, WrapperType};
use crate::definition::{AspectDefinition, ModelChanged, UiUpdater, application_error, expect_type};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

/// Binds the property value to a value-holding component, both ways.
///
/// Model to UI: sets the value and marks the component read-only when the
/// chain derives it read-only or no write is possible. UI to model: every
/// user-entered value is pushed, then the model change is announced.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueAspectDefinition;

impl ValueAspectDefinition {
    pub const NAME: &'static str = Aspect::VALUE;

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub const fn create_aspect(&self) -> Aspect {
        Aspect::value_aspect()
    }
}

fn mismatch() -> BindingError {
    BindingError::ComponentMismatch {
        expected: "a value holder",
        aspect: "value".to_owned(),
    }
}

fn apply(dispatcher: &dyn PropertyDispatcher, wrapper: &dyn ComponentWrapper) -> Result<(), BindingError> {
    let component = wrapper.component();
    let field = component.as_has_value().ok_or_else(mismatch)?;
    let value = dispatcher.pull(&Aspect::value_aspect())?;
    let derived = dispatcher.pull(&Aspect::of(Aspect::DERIVED_READ_ONLY))?;
    let read_only = expect_type::<bool>(Aspect::DERIVED_READ_ONLY, &derived)?
        || !dispatcher.is_push_available(&Aspect::with_value(Aspect::VALUE, value.clone()));
    field.set_value(value);
    field.set_read_only(read_only);
    Ok(())
}

impl AspectDefinition for ValueAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        let dispatcher = Rc::clone(dispatcher);
        let wrapper = Rc::clone(wrapper);
        Box::new(move || {
            apply(dispatcher.as_ref(), wrapper.as_ref())
                .map_err(|err| application_error(Self::NAME, dispatcher.as_ref(), err))
        })
    }

    fn init_model_update(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
        on_model_changed: ModelChanged,
    ) -> Result<(), BindingError> {
        let dispatcher = Rc::clone(dispatcher);
        let registered = wrapper.register_value_listener(Rc::new(move |value: Value| {
            dispatcher.push(&Aspect::with_value(Aspect::VALUE, value))?;
            on_model_changed()
        }));
        if registered { Ok(()) } else { Err(mismatch()) }
    }

    fn supports(&self, wrapper_type: WrapperType) -> bool {
        wrapper_type.is_assignable_to(WrapperType::Field)
    }
}
