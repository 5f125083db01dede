//! Aspect definitions: how one aspect flows between dispatcher and component.
//!
//! A definition is built once from its declarative mode and reused for every
//! binding that declares it. For each binding it produces a [`UiUpdater`]
//! (model to UI) and optionally registers a model update on the component
//! (UI to model).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unresolvable dynamic aspect | Model lacks e.g. `isXEnabled` | `AspectApplication` wrapping `Unresolved` |
//! | Wrong aspect type | Model method returns e.g. `String` for `enabled` | `AspectApplication` wrapping `ValueType` |
//! | Missing capability | Value aspect on a component without a value | `ComponentMismatch` |
//! | Composite member fails | Any of the above inside a composite | `CompositeMember` naming the member |

use std::any::Any;
use std::rc::Rc;

use bindery_reflect::Value;

use crate::aspect::{Aspect, display_name};
use crate::component::{ComponentWrapper, WrapperType};
use crate::dispatcher::{PropertyDispatcher, class_name};
use crate::error::BindingError;

pub mod applicable;
pub mod available_values;
pub mod button;
pub mod composite;
pub mod enabled;
pub mod label;
pub mod required;
pub mod tooltip;
pub mod value;
pub mod visible;

pub use applicable::ApplicableTypeAspectDefinition;
pub use available_values::{AvailableValuesAspectDefinition, AvailableValuesType};
pub use button::ButtonInvokeAspectDefinition;
pub use composite::CompositeAspectDefinition;
pub use enabled::{EnabledAspectDefinition, EnabledType};
pub use label::{LabelAspectDefinition, LabelType};
pub use required::{RequiredAspectDefinition, RequiredType};
pub use tooltip::{ToolTipAspectDefinition, ToolTipType};
pub use value::ValueAspectDefinition;
pub use visible::{VisibleAspectDefinition, VisibleType};

/// Applies one aspect from the model to the component.
pub type UiUpdater = Box<dyn Fn() -> Result<(), BindingError>>;

/// Notification that the model was changed through the UI.
pub type ModelChanged = Rc<dyn Fn() -> Result<(), BindingError>>;

/// One aspect of a bound property, from declaration to component.
pub trait AspectDefinition {
    /// Diagnostic name.
    fn name(&self) -> &str;

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater;

    /// Register UI-to-model propagation on the component.
    fn init_model_update(
        &self,
        _dispatcher: &Rc<dyn PropertyDispatcher>,
        _wrapper: &Rc<dyn ComponentWrapper>,
        _on_model_changed: ModelChanged,
    ) -> Result<(), BindingError> {
        Ok(())
    }

    /// Whether the definition applies to wrappers of `wrapper_type`.
    fn supports(&self, wrapper_type: WrapperType) -> bool {
        wrapper_type.is_assignable_to(WrapperType::Component)
    }
}

/// Wrap `source` with the aspect and the dispatcher's property and class.
pub(crate) fn application_error(
    aspect: &str,
    dispatcher: &dyn PropertyDispatcher,
    source: BindingError,
) -> BindingError {
    BindingError::AspectApplication {
        aspect: display_name(aspect).to_owned(),
        class: class_name(dispatcher),
        property: dispatcher.property().to_owned(),
        source: Box::new(source),
    }
}

pub(crate) fn expect_type<T: Any + Clone>(aspect: &str, value: &Value) -> Result<T, BindingError> {
    value.get::<T>().ok_or_else(|| BindingError::ValueType {
        aspect: display_name(aspect).to_owned(),
        expected: std::any::type_name::<T>(),
        found: value.type_name(),
    })
}

/// An updater pulling `aspect` as a `T` and handing it to `apply`.
pub(crate) fn typed_updater<T: Any + Clone>(
    aspect: Aspect,
    dispatcher: &Rc<dyn PropertyDispatcher>,
    wrapper: &Rc<dyn ComponentWrapper>,
    apply: impl Fn(&dyn ComponentWrapper, T) -> Result<(), BindingError> + 'static,
) -> UiUpdater {
    let dispatcher = Rc::clone(dispatcher);
    let wrapper = Rc::clone(wrapper);
    Box::new(move || {
        let result = dispatcher
            .pull(&aspect)
            .map_err(BindingError::from)
            .and_then(|value| expect_type::<T>(aspect.name(), &value))
            .and_then(|value| apply(wrapper.as_ref(), value));
        result.map_err(|err| application_error(aspect.name(), dispatcher.as_ref(), err))
    })
}

pub(crate) fn no_op_updater() -> UiUpdater {
    Box::new(|| Ok(()))
}
