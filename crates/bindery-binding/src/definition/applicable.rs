use std::marker::PhantomData;
use std::rc::Rc;

use crate::component::{Component, ComponentWrapper, WrapperType};
use crate::definition::{AspectDefinition, ModelChanged, UiUpdater, no_op_updater};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

/// Applies the wrapped definition only to components of type `C`.
pub struct ApplicableTypeAspectDefinition<C> {
    inner: Rc<dyn AspectDefinition>,
    _component: PhantomData<fn() -> C>,
}

impl<C: Component> ApplicableTypeAspectDefinition<C> {
    #[must_use]
    pub fn new(inner: Rc<dyn AspectDefinition>) -> Self {
        Self {
            inner,
            _component: PhantomData,
        }
    }

    fn applies(wrapper: &dyn ComponentWrapper) -> bool {
        wrapper.component().as_any().is::<C>()
    }
}

impl<C: Component> AspectDefinition for ApplicableTypeAspectDefinition<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        if Self::applies(wrapper.as_ref()) {
            self.inner.create_ui_updater(dispatcher, wrapper)
        } else {
            no_op_updater()
        }
    }

    fn init_model_update(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
        on_model_changed: ModelChanged,
    ) -> Result<(), BindingError> {
        if Self::applies(wrapper.as_ref()) {
            self.inner.init_model_update(dispatcher, wrapper, on_model_changed)
        } else {
            Ok(())
        }
    }

    fn supports(&self, wrapper_type: WrapperType) -> bool {
        self.inner.supports(wrapper_type)
    }
}
