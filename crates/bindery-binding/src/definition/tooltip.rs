use std::borrow::Cow;
use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::Aspect;
use crate::component::ComponentWrapper;
use crate::definition::{AspectDefinition, UiUpdater, typed_updater};
use crate::dispatcher::PropertyDispatcher;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolTipType {
    Static(Cow<'static, str>),
    /// Read from `get{Property}ToolTip`.
    Dynamic,
}

impl Default for ToolTipType {
    fn default() -> Self {
        Self::Static(Cow::Borrowed(""))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ToolTipAspectDefinition {
    tooltip: ToolTipType,
}

impl ToolTipAspectDefinition {
    pub const NAME: &'static str = Aspect::TOOLTIP;

    #[must_use]
    pub fn new(tooltip: ToolTipType) -> Self {
        Self { tooltip }
    }

    #[must_use]
    pub fn create_aspect(&self) -> Aspect {
        match &self.tooltip {
            ToolTipType::Static(text) => Aspect::with_value(Self::NAME, Value::new(text.to_string())),
            ToolTipType::Dynamic => Aspect::of(Self::NAME),
        }
    }
}

impl AspectDefinition for ToolTipAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        typed_updater(self.create_aspect(), dispatcher, wrapper, |w, tooltip: String| {
            w.set_tooltip(&tooltip);
            Ok(())
        })
    }
}
