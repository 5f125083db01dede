//! In-memory components that record what bindings do to them.
//!
//! Useful for tests and headless runs: every setter stores its last value,
//! and user input is simulated with [`RecordingField::enter`] and
//! [`RecordingButton::click`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_message::MessageList;
use bindery_reflect::Value;

use crate::component::{
    Clickable, ClickListener, Component, ComponentRef, ComponentWrapper, HasItems, HasValue, ValueListener,
    WrapperType,
};
use crate::error::BindingError;

/// A value-holding choice field.
#[derive(Default)]
pub struct RecordingField {
    value: RefCell<Value>,
    items: RefCell<Vec<Value>>,
    read_only: Cell<bool>,
    required: Cell<bool>,
    updates: Cell<usize>,
    listeners: RefCell<Vec<ValueListener>>,
}

impl RecordingField {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The shown value as a string, if it is one.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.value.borrow().get::<String>()
    }

    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.get()
    }

    /// How often the value was set programmatically.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    /// Simulate the user entering `value`.
    pub fn enter(&self, value: Value) -> Result<(), BindingError> {
        *self.value.borrow_mut() = value.clone();
        let listeners = self.listeners.borrow().clone();
        listeners.iter().try_for_each(|listener| listener(value.clone()))
    }
}

impl Component for RecordingField {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_has_value(&self) -> Option<&dyn HasValue> {
        Some(self)
    }

    fn as_has_items(&self) -> Option<&dyn HasItems> {
        Some(self)
    }
}

impl HasValue for RecordingField {
    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: Value) {
        *self.value.borrow_mut() = value;
        self.updates.set(self.updates.get() + 1);
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    fn set_required(&self, required: bool) {
        self.required.set(required);
    }

    fn add_value_listener(&self, listener: ValueListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

impl HasItems for RecordingField {
    fn set_items(&self, items: Vec<Value>) {
        *self.items.borrow_mut() = items;
    }
}

#[derive(Default)]
pub struct RecordingButton {
    listeners: RefCell<Vec<ClickListener>>,
}

impl RecordingButton {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Simulate a click.
    pub fn click(&self) -> Result<(), BindingError> {
        let listeners = self.listeners.borrow().clone();
        listeners.iter().try_for_each(|listener| listener())
    }
}

impl Component for RecordingButton {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Clickable for RecordingButton {
    fn add_click_listener(&self, listener: ClickListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

/// A layout composing other components.
#[derive(Default)]
pub struct RecordingPanel {
    children: RefCell<Vec<ComponentRef>>,
}

impl RecordingPanel {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add(&self, child: ComponentRef) {
        self.children.borrow_mut().push(child);
    }

    pub fn remove(&self, child: &ComponentRef) {
        self.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, child));
    }
}

impl Component for RecordingPanel {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.children.borrow().clone()
    }
}

/// Records the decorations applied to a component.
pub struct RecordingWrapper {
    component: ComponentRef,
    wrapper_type: WrapperType,
    enabled: Cell<Option<bool>>,
    visible: Cell<Option<bool>>,
    label: RefCell<Option<String>>,
    tooltip: RefCell<Option<String>>,
    messages: RefCell<MessageList>,
}

impl RecordingWrapper {
    /// A [`WrapperType::Field`] wrapper.
    #[must_use]
    pub fn new(component: ComponentRef) -> Rc<Self> {
        Self::with_type(component, WrapperType::Field)
    }

    #[must_use]
    pub fn with_type(component: ComponentRef, wrapper_type: WrapperType) -> Rc<Self> {
        Rc::new(Self {
            component,
            wrapper_type,
            enabled: Cell::new(None),
            visible: Cell::new(None),
            label: RefCell::new(None),
            tooltip: RefCell::new(None),
            messages: RefCell::new(MessageList::new()),
        })
    }

    /// Last enabled state set, `None` if never set.
    #[must_use]
    pub fn enabled(&self) -> Option<bool> {
        self.enabled.get()
    }

    #[must_use]
    pub fn visible(&self) -> Option<bool> {
        self.visible.get()
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<String> {
        self.tooltip.borrow().clone()
    }

    #[must_use]
    pub fn messages(&self) -> MessageList {
        self.messages.borrow().clone()
    }
}

impl ComponentWrapper for RecordingWrapper {
    fn component(&self) -> ComponentRef {
        Rc::clone(&self.component)
    }

    fn wrapper_type(&self) -> WrapperType {
        self.wrapper_type
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(Some(enabled));
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(Some(visible));
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = Some(label.to_owned());
    }

    fn set_tooltip(&self, tooltip: &str) {
        *self.tooltip.borrow_mut() = Some(tooltip.to_owned());
    }

    fn set_validation_messages(&self, messages: &MessageList) {
        *self.messages.borrow_mut() = messages.clone();
    }
}
