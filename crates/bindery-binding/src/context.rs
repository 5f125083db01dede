//! The binding registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use bindery_message::MessageList;
use bindery_reflect::{BoundObject, PropertyAccessor};
use tracing::{debug, debug_span, trace};

use crate::annotation::FieldAnnotation;
use crate::binding::{Binding, ElementBinding};
use crate::component::{ComponentKey, ComponentRef, ComponentWrapper};
use crate::container::ContainerBinding;
use crate::definition::{AspectDefinition, CompositeAspectDefinition, ModelChanged};
use crate::dispatcher::{ModelBinding, PropertyDispatcherFactory, accessor_error};
use crate::error::BindingError;

type AfterUpdateHandler = Rc<dyn Fn(&BindingContext)>;

struct ContextInner {
    name: String,
    factory: PropertyDispatcherFactory,
    parent: Option<Weak<ContextInner>>,
    bindings: RefCell<AHashMap<ComponentKey, Rc<dyn Binding>>>,
    after_update: RefCell<Option<AfterUpdateHandler>>,
}

/// Owns the bindings of one UI area and refreshes them together.
///
/// A context is a cheap, clonable handle. Each component has at most one
/// binding per context; binding a component again replaces its binding.
/// Model update callbacks registered on components only hold a weak
/// reference to the context.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use bindery_binding::testing::{RecordingField, RecordingWrapper};
/// use bindery_binding::{BindingContext, FieldAnnotation};
/// use bindery_reflect::{BoundObject, ClassBuilder, Reflect};
///
/// struct Greeting {
///     text: String,
/// }
///
/// impl Reflect for Greeting {
///     fn reflect(class: &mut ClassBuilder<Self>) {
///         class
///             .method("getText", |g: &Greeting| g.text.clone())
///             .method1("setText", |g: &mut Greeting, t: String| g.text = t);
///     }
/// }
///
/// let pmo = BoundObject::new(Greeting { text: "hello".into() });
/// let field = RecordingField::new();
/// let wrapper = RecordingWrapper::new(field.clone());
///
/// let context = BindingContext::new("greeting");
/// context.bind_field(&pmo, "text", &FieldAnnotation::field(), wrapper.clone())?;
/// assert_eq!(field.text().as_deref(), Some("hello"));
/// assert_eq!(wrapper.label().as_deref(), Some("Text"));
/// # Ok::<(), bindery_binding::BindingError>(())
/// ```
#[derive(Clone)]
pub struct BindingContext {
    inner: Rc<ContextInner>,
}

impl BindingContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_dispatcher_factory(name, PropertyDispatcherFactory::new())
    }

    #[must_use]
    pub fn with_dispatcher_factory(name: impl Into<String>, factory: PropertyDispatcherFactory) -> Self {
        Self::create(name.into(), factory, None)
    }

    fn create(name: String, factory: PropertyDispatcherFactory, parent: Option<Weak<ContextInner>>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                name,
                factory,
                parent,
                bindings: RefCell::new(AHashMap::new()),
                after_update: RefCell::new(None),
            }),
        }
    }

    /// A child context sharing this context's dispatcher factory; model
    /// changes in the child are handled by this context.
    pub(crate) fn nested(&self, name: String) -> Self {
        Self::create(name, self.inner.factory.clone(), Some(Rc::downgrade(&self.inner)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn dispatcher_factory(&self) -> &PropertyDispatcherFactory {
        &self.inner.factory
    }

    /// Bind `property` of `pmo` to the wrapper's component.
    ///
    /// The definitions are applied in order. The component is updated once
    /// before the binding is registered; if that fails, nothing stays bound.
    pub fn bind(
        &self,
        pmo: &BoundObject,
        property: &str,
        definitions: &[Rc<dyn AspectDefinition>],
        wrapper: Rc<dyn ComponentWrapper>,
    ) -> Result<Rc<ElementBinding>, BindingError> {
        self.bind_with(pmo, property, definitions, wrapper, None)
    }

    /// Like [`bind`](Self::bind), redirecting the value aspect to a model attribute.
    pub fn bind_with(
        &self,
        pmo: &BoundObject,
        property: &str,
        definitions: &[Rc<dyn AspectDefinition>],
        wrapper: Rc<dyn ComponentWrapper>,
        model_binding: Option<ModelBinding>,
    ) -> Result<Rc<ElementBinding>, BindingError> {
        let binding = Rc::new(self.create_element(pmo, property, definitions, wrapper, model_binding)?);
        if let Err(err) = binding.update_from_pmo() {
            binding.release();
            return Err(err);
        }
        self.insert(Rc::clone(&binding) as Rc<dyn Binding>);
        Ok(binding)
    }

    /// Bind `property` as declared by `annotation`.
    ///
    /// With a model attribute, the model object is read from the PMO property
    /// named by [`FieldAnnotation::model_object_property`]; it must return a
    /// [`BoundObject`].
    pub fn bind_field(
        &self,
        pmo: &BoundObject,
        property: &str,
        annotation: &FieldAnnotation,
        wrapper: Rc<dyn ComponentWrapper>,
    ) -> Result<Rc<ElementBinding>, BindingError> {
        let model_binding = match annotation.model_attribute_for(property) {
            Some(attribute) => {
                let model = model_object(pmo, annotation.model_object_property())?;
                Some(ModelBinding::new(model, attribute))
            }
            None => None,
        };
        self.bind_with(pmo, property, &annotation.aspect_definitions(), wrapper, model_binding)
    }

    /// Bind a container, e.g. a table, whose children are derived from the model.
    ///
    /// The container's own aspects are resolved against `pmo` itself (empty
    /// property). `create_child` binds one child in the container's nested
    /// context and returns the child's component.
    pub fn bind_container(
        &self,
        pmo: &BoundObject,
        definitions: &[Rc<dyn AspectDefinition>],
        wrapper: Rc<dyn ComponentWrapper>,
        children: impl Fn() -> Vec<BoundObject> + 'static,
        create_child: impl Fn(&BindingContext, &BoundObject) -> Result<ComponentRef, BindingError> + 'static,
    ) -> Result<Rc<ContainerBinding>, BindingError> {
        let element = self.create_element(pmo, "", definitions, wrapper, None)?;
        let nested = self.nested(format!("{}/{}", self.name(), pmo.type_name()));
        let container = Rc::new(ContainerBinding::new(
            element,
            nested,
            Box::new(children),
            Box::new(create_child),
        ));
        if let Err(err) = container.update_from_pmo() {
            container.release();
            return Err(err);
        }
        self.insert(Rc::clone(&container) as Rc<dyn Binding>);
        Ok(container)
    }

    fn create_element(
        &self,
        pmo: &BoundObject,
        property: &str,
        definitions: &[Rc<dyn AspectDefinition>],
        wrapper: Rc<dyn ComponentWrapper>,
        model_binding: Option<ModelBinding>,
    ) -> Result<ElementBinding, BindingError> {
        let dispatcher = self.inner.factory.create(pmo, property, model_binding.as_ref());
        let definition = CompositeAspectDefinition::new(definitions.to_vec());
        ElementBinding::new(
            pmo.clone(),
            dispatcher,
            wrapper,
            &definition,
            model_binding,
            self.model_changed_handler(),
        )
    }

    fn model_changed_handler(&self) -> ModelChanged {
        let context = Rc::downgrade(&self.inner);
        Rc::new(move || match context.upgrade() {
            Some(inner) => BindingContext { inner }.model_changed(),
            None => Ok(()),
        })
    }

    fn insert(&self, binding: Rc<dyn Binding>) {
        let key = ComponentKey::of(&binding.bound_component());
        debug!(context = %self.inner.name, pmo = ?binding.pmo(), "binding added");
        let replaced = self.inner.bindings.borrow_mut().insert(key, binding);
        if let Some(previous) = replaced {
            debug!(context = %self.inner.name, "binding replaced");
            previous.release();
        }
    }

    /// Apply the model to every component.
    ///
    /// Stops at the first failing binding; bindings stay registered.
    pub fn update_ui(&self) -> Result<(), BindingError> {
        let bindings = self.bindings();
        let _span = debug_span!("update_ui", context = %self.inner.name, bindings = bindings.len()).entered();
        for binding in &bindings {
            binding.update_from_pmo()?;
        }
        trace!("ui updated");
        Ok(())
    }

    /// React to a model change from the UI: update all components, then run
    /// the after-update handler.
    ///
    /// A nested context forwards to its parent, so the whole UI is refreshed.
    pub fn model_changed(&self) -> Result<(), BindingError> {
        if let Some(parent) = self.inner.parent.as_ref().and_then(Weak::upgrade) {
            return BindingContext { inner: parent }.model_changed();
        }
        self.update_ui()?;
        let handler = self.inner.after_update.borrow().clone();
        if let Some(handler) = handler {
            handler(self);
        }
        Ok(())
    }

    /// Run `handler` after every model change, e.g. to revalidate.
    pub fn set_after_update_handler(&self, handler: impl Fn(&BindingContext) + 'static) {
        *self.inner.after_update.borrow_mut() = Some(Rc::new(handler));
    }

    /// Let every binding show its messages; returns all messages shown.
    pub fn display_messages(&self, messages: &MessageList) -> MessageList {
        let mut shown = MessageList::new();
        for binding in self.bindings() {
            shown.extend(binding.display_messages(messages));
        }
        shown
    }

    /// Remove the binding of `component` and of all components composed in it.
    pub fn remove_bindings_for_component(&self, component: &ComponentRef) {
        let removed = self
            .inner
            .bindings
            .borrow_mut()
            .remove(&ComponentKey::of(component));
        if let Some(binding) = removed {
            debug!(context = %self.inner.name, pmo = ?binding.pmo(), "binding removed");
            binding.release();
        }
        for child in component.children() {
            self.remove_bindings_for_component(&child);
        }
    }

    /// Remove every binding of `pmo`.
    pub fn remove_bindings_for_pmo(&self, pmo: &BoundObject) {
        let mut removed = Vec::new();
        self.inner.bindings.borrow_mut().retain(|_, binding| {
            let matches = binding.pmo() == pmo;
            if matches {
                removed.push(Rc::clone(binding));
            }
            !matches
        });
        debug!(context = %self.inner.name, ?pmo, removed = removed.len(), "bindings removed");
        for binding in removed {
            binding.release();
        }
    }

    /// Remove all bindings.
    pub fn clear(&self) {
        let removed: Vec<_> = self.inner.bindings.borrow_mut().drain().map(|(_, b)| b).collect();
        for binding in removed {
            binding.release();
        }
    }

    #[must_use]
    pub fn binding_for(&self, component: &ComponentRef) -> Option<Rc<dyn Binding>> {
        self.inner.bindings.borrow().get(&ComponentKey::of(component)).cloned()
    }

    #[must_use]
    pub fn bindings(&self) -> Vec<Rc<dyn Binding>> {
        self.inner.bindings.borrow().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.bindings.borrow().is_empty()
    }
}

fn model_object(pmo: &BoundObject, property: &str) -> Result<BoundObject, BindingError> {
    let value = PropertyAccessor::for_object(pmo, property)
        .get_property_value(pmo)
        .map_err(|err| accessor_error(pmo, property, err))?;
    value.get::<BoundObject>().ok_or_else(|| BindingError::ValueType {
        aspect: property.to_owned(),
        expected: std::any::type_name::<BoundObject>(),
        found: value.type_name(),
    })
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("name", &self.inner.name)
            .field("bindings", &self.len())
            .finish()
    }
}
