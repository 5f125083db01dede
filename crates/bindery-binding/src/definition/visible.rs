use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::ComponentWrapper;
use crate::definition::{AspectDefinition, UiUpdater, typed_updater};
use crate::dispatcher::PropertyDispatcher;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibleType {
    #[default]
    Visible,
    Invisible,
    /// Read from `is{Property}Visible`.
    Dynamic,
}

/// Shows or hides the component.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibleAspectDefinition {
    visible: VisibleType,
}

impl VisibleAspectDefinition {
    pub const NAME: &'static str = Aspect::VISIBLE;

    #[must_use]
    pub const fn new(visible: VisibleType) -> Self {
        Self { visible }
    }

    #[must_use]
    pub fn create_aspect(&self) -> Aspect {
        match self.visible {
            VisibleType::Visible => Aspect::with_value(Self::NAME, Value::new(true)),
            VisibleType::Invisible => Aspect::with_value(Self::NAME, Value::new(false)),
            VisibleType::Dynamic => Aspect::of(Self::NAME),
        }
    }
}

impl AspectDefinition for VisibleAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        typed_updater(self.create_aspect(), dispatcher, wrapper, |w, visible: bool| {
            w.set_visible(visible);
            Ok(())
        })
    }
}
