use std::rc::Rc;

use crate::aspect::Aspect;
use crate::component::ComponentWrapper;
use crate::definition::{AspectDefinition, ModelChanged, UiUpdater, no_op_updater};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

/// Invokes the method named like the property when the component is clicked.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonInvokeAspectDefinition;

impl ButtonInvokeAspectDefinition {
    pub const NAME: &'static str = "buttonInvoke";

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The value aspect without a value: pushing it invokes.
    #[must_use]
    pub const fn create_aspect(&self) -> Aspect {
        Aspect::value_aspect()
    }
}

impl AspectDefinition for ButtonInvokeAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        _dispatcher: &Rc<dyn PropertyDispatcher>,
        _wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        no_op_updater()
    }

    fn init_model_update(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
        on_model_changed: ModelChanged,
    ) -> Result<(), BindingError> {
        let component = wrapper.component();
        let button = component
            .as_clickable()
            .ok_or_else(|| BindingError::ComponentMismatch {
                expected: "clickable",
                aspect: Self::NAME.to_owned(),
            })?;
        let dispatcher = Rc::clone(dispatcher);
        let aspect = self.create_aspect();
        button.add_click_listener(Rc::new(move || {
            dispatcher.push(&aspect)?;
            on_model_changed()
        }));
        Ok(())
    }
}
