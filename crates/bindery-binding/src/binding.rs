//! Bindings: one presentation model property attached to one component.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use bindery_message::MessageList;
use bindery_reflect::{BoundObject, Value, ValueType};

use crate::aspect::Aspect;
use crate::component::{ComponentRef, ComponentWrapper};
use crate::definition::{AspectDefinition, ModelChanged, UiUpdater};
use crate::dispatcher::{ModelBinding, PropertyDispatcher};
use crate::error::{BindingError, DispatchError};

/// A live association between model and UI, owned by a
/// [`BindingContext`](crate::BindingContext).
pub trait Binding {
    /// Apply all aspects from the model to the component.
    fn update_from_pmo(&self) -> Result<(), BindingError>;

    fn bound_component(&self) -> ComponentRef;

    fn pmo(&self) -> &BoundObject;

    /// Show the messages addressed to this binding and return them.
    fn display_messages(&self, messages: &MessageList) -> MessageList;

    /// Called once when the binding leaves its context.
    fn release(&self) {}
}

/// The binding of a single property to a single component.
pub struct ElementBinding {
    pmo: BoundObject,
    dispatcher: Rc<dyn PropertyDispatcher>,
    wrapper: Rc<dyn ComponentWrapper>,
    model_binding: Option<ModelBinding>,
    updater: UiUpdater,
    attached: Rc<Cell<bool>>,
}

impl ElementBinding {
    /// Create the binding and register its model updates on the component.
    ///
    /// The component is not updated yet. Listeners registered here go inert
    /// once the binding is released, or right away if registration fails.
    pub fn new(
        pmo: BoundObject,
        dispatcher: Rc<dyn PropertyDispatcher>,
        wrapper: Rc<dyn ComponentWrapper>,
        definition: &dyn AspectDefinition,
        model_binding: Option<ModelBinding>,
        on_model_changed: ModelChanged,
    ) -> Result<Self, BindingError> {
        let updater = definition.create_ui_updater(&dispatcher, &wrapper);
        let attached = Rc::new(Cell::new(true));
        let detachable: Rc<dyn PropertyDispatcher> = Rc::new(DetachableDispatcher {
            inner: Rc::clone(&dispatcher),
            attached: Rc::clone(&attached),
        });
        let guard = Rc::clone(&attached);
        let on_model_changed: ModelChanged = Rc::new(move || {
            if guard.get() {
                on_model_changed()
            } else {
                Ok(())
            }
        });
        if let Err(err) = definition.init_model_update(&detachable, &wrapper, on_model_changed) {
            attached.set(false);
            return Err(err);
        }
        Ok(Self {
            pmo,
            dispatcher,
            wrapper,
            model_binding,
            updater,
            attached,
        })
    }

    #[must_use]
    pub fn property(&self) -> &str {
        self.dispatcher.property()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Rc<dyn PropertyDispatcher> {
        &self.dispatcher
    }

    #[must_use]
    pub fn wrapper(&self) -> &Rc<dyn ComponentWrapper> {
        &self.wrapper
    }

    #[must_use]
    pub fn model_binding(&self) -> Option<&ModelBinding> {
        self.model_binding.as_ref()
    }

    /// Messages about this binding's property, or its model attribute.
    #[must_use]
    pub fn relevant_messages(&self, messages: &MessageList) -> MessageList {
        let property = self.property();
        messages
            .iter()
            .filter(|m| {
                m.concerns_property(&self.pmo, property)
                    || self
                        .model_binding
                        .as_ref()
                        .is_some_and(|mb| m.concerns_property(mb.object(), mb.attribute()))
            })
            .cloned()
            .collect()
    }
}

impl Binding for ElementBinding {
    fn update_from_pmo(&self) -> Result<(), BindingError> {
        (self.updater)()
    }

    fn bound_component(&self) -> ComponentRef {
        self.wrapper.component()
    }

    fn pmo(&self) -> &BoundObject {
        &self.pmo
    }

    fn display_messages(&self, messages: &MessageList) -> MessageList {
        let relevant = self.relevant_messages(messages);
        self.wrapper.set_validation_messages(&relevant);
        relevant
    }

    fn release(&self) {
        self.attached.set(false);
    }
}

/// Forwards to the binding's dispatcher until the binding is released; after
/// that pushes are dropped.
struct DetachableDispatcher {
    inner: Rc<dyn PropertyDispatcher>,
    attached: Rc<Cell<bool>>,
}

impl PropertyDispatcher for DetachableDispatcher {
    fn property(&self) -> &str {
        self.inner.property()
    }

    fn bound_object(&self) -> Option<BoundObject> {
        self.inner.bound_object()
    }

    fn value_type(&self) -> Result<ValueType, DispatchError> {
        self.inner.value_type()
    }

    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError> {
        self.inner.pull(aspect)
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        if self.attached.get() {
            self.inner.push(aspect)
        } else {
            Ok(())
        }
    }

    fn is_push_available(&self, aspect: &Aspect) -> bool {
        self.attached.get() && self.inner.is_push_available(aspect)
    }
}

impl fmt::Debug for ElementBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBinding")
            .field("pmo", &self.pmo)
            .field("property", &self.property())
            .field("model_binding", &self.model_binding)
            .finish_non_exhaustive()
    }
}
