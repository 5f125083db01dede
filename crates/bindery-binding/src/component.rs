//! The boundary to a UI toolkit.
//!
//! bindery never draws anything. A toolkit adapter implements [`Component`]
//! for its widgets (plus the capability traits the widget supports) and
//! [`ComponentWrapper`] for the surrounding decoration: label, enabled
//! state, visibility, tooltip and validation messages.
//!
//! Components are `Rc`-shared and use interior mutability, like the
//! toolkit objects they stand for.

use std::any::Any;
use std::rc::Rc;

use bindery_message::MessageList;
use bindery_reflect::Value;

use crate::error::BindingError;

/// Shared handle to a component.
pub type ComponentRef = Rc<dyn Component>;

/// Callback for values entered by the user.
pub type ValueListener = Rc<dyn Fn(Value) -> Result<(), BindingError>>;

/// Callback for user clicks.
pub type ClickListener = Rc<dyn Fn() -> Result<(), BindingError>>;

/// Identity of a component, used to key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(usize);

impl ComponentKey {
    #[must_use]
    pub fn of(component: &ComponentRef) -> Self {
        Self(Rc::as_ptr(component).cast::<()>() as usize)
    }
}

/// A UI control or layout.
pub trait Component: Any {
    fn as_any(&self) -> &dyn Any;

    /// Directly composed child components.
    fn children(&self) -> Vec<ComponentRef> {
        Vec::new()
    }

    fn as_has_value(&self) -> Option<&dyn HasValue> {
        None
    }

    fn as_has_items(&self) -> Option<&dyn HasItems> {
        None
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        None
    }
}

/// A component showing and editing a single value.
///
/// `set_value` is a programmatic update and must not notify value listeners;
/// listeners only hear about user input.
pub trait HasValue {
    fn value(&self) -> Value;
    fn set_value(&self, value: Value);
    fn set_read_only(&self, read_only: bool);
    fn set_required(&self, required: bool);
    fn add_value_listener(&self, listener: ValueListener);
}

/// A component offering a list of choices.
pub trait HasItems {
    fn set_items(&self, items: Vec<Value>);
}

/// A component reacting to clicks.
pub trait Clickable {
    fn add_click_listener(&self, listener: ClickListener);
}

/// Kind of UI target, used by aspect definitions to decide whether they apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapperType {
    /// Any component.
    Component,
    /// An input or display field.
    Field,
    /// A layout or section grouping other components.
    Layout,
    /// The header of a table column, sharing its property with the cells.
    ColumnHeader,
}

impl WrapperType {
    #[must_use]
    pub const fn parent(self) -> Option<WrapperType> {
        match self {
            Self::Component => None,
            Self::Field | Self::Layout | Self::ColumnHeader => Some(Self::Component),
        }
    }

    /// Whether a wrapper of this type can stand in for `other`.
    #[must_use]
    pub fn is_assignable_to(self, other: WrapperType) -> bool {
        self == other || self.parent().is_some_and(|parent| parent.is_assignable_to(other))
    }
}

/// Decorations around a component.
pub trait ComponentWrapper {
    fn component(&self) -> ComponentRef;

    fn wrapper_type(&self) -> WrapperType {
        WrapperType::Field
    }

    fn set_enabled(&self, enabled: bool);
    fn set_visible(&self, visible: bool);
    fn set_label(&self, label: &str);
    fn set_tooltip(&self, tooltip: &str);
    fn set_validation_messages(&self, messages: &MessageList);

    /// Register a listener for user-entered values.
    ///
    /// Returns `false` if the component does not hold a value.
    fn register_value_listener(&self, listener: ValueListener) -> bool {
        let component = self.component();
        match component.as_has_value() {
            Some(field) => {
                field.add_value_listener(listener);
                true
            }
            None => false,
        }
    }
}
