use std::borrow::Cow;
use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::ComponentWrapper;
use crate::definition::{AspectDefinition, UiUpdater, typed_updater};
use crate::dispatcher::PropertyDispatcher;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LabelType {
    /// Fixed text.
    Static(Cow<'static, str>),
    /// The capitalized property name.
    #[default]
    Derived,
    /// Read from `get{Property}Label`.
    Dynamic,
}

/// Sets the label next to the component.
#[derive(Clone, Debug, Default)]
pub struct LabelAspectDefinition {
    label: LabelType,
}

impl LabelAspectDefinition {
    pub const NAME: &'static str = Aspect::LABEL;

    #[must_use]
    pub fn new(label: LabelType) -> Self {
        Self { label }
    }

    #[must_use]
    pub fn create_aspect(&self) -> Aspect {
        match &self.label {
            LabelType::Static(text) => Aspect::with_value(Self::NAME, Value::new(text.to_string())),
            LabelType::Derived => Aspect::with_value(Self::NAME, Value::new(String::new())),
            LabelType::Dynamic => Aspect::of(Self::NAME),
        }
    }
}

impl AspectDefinition for LabelAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        typed_updater(self.create_aspect(), dispatcher, wrapper, |w, label: String| {
            w.set_label(&label);
            Ok(())
        })
    }
}
