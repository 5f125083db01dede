//! Bindings of containers whose children follow the model.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use bindery_message::MessageList;
use bindery_reflect::{BoundObject, ObjectKey};
use tracing::debug;

use crate::binding::{Binding, ElementBinding};
use crate::component::{ComponentKey, ComponentRef};
use crate::context::BindingContext;
use crate::error::BindingError;

/// Supplies the current child objects of a container.
pub type ChildrenProvider = Box<dyn Fn() -> Vec<BoundObject>>;

/// Binds one child in the container's context and returns its component.
pub type ChildFactory = Box<dyn Fn(&BindingContext, &BoundObject) -> Result<ComponentRef, BindingError>>;

/// Notified after a vanished child's bindings were released.
pub type ChildRemovedHandler = Box<dyn Fn(&BoundObject, &ComponentRef)>;

#[derive(Clone)]
struct Materialized {
    object: BoundObject,
    component: ComponentRef,
}

/// The binding of a container plus the bindings of its materialized children.
///
/// Every update re-derives the child list. An identical list (same objects
/// in the same order) changes nothing. Otherwise children that are still
/// present keep their bindings and components, new children are created
/// through the child factory and vanished children are released.
pub struct ContainerBinding {
    element: ElementBinding,
    context: BindingContext,
    children: ChildrenProvider,
    create_child: ChildFactory,
    on_child_removed: RefCell<Option<ChildRemovedHandler>>,
    materialized: RefCell<Vec<Materialized>>,
}

impl ContainerBinding {
    pub(crate) fn new(
        element: ElementBinding,
        context: BindingContext,
        children: ChildrenProvider,
        create_child: ChildFactory,
    ) -> Self {
        Self {
            element,
            context,
            children,
            create_child,
            on_child_removed: RefCell::new(None),
            materialized: RefCell::new(Vec::new()),
        }
    }

    /// The nested context holding the child bindings.
    #[must_use]
    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    /// The container's own binding.
    #[must_use]
    pub fn element(&self) -> &ElementBinding {
        &self.element
    }

    /// The materialized child objects, in order.
    #[must_use]
    pub fn children(&self) -> Vec<BoundObject> {
        self.materialized.borrow().iter().map(|c| c.object.clone()).collect()
    }

    #[must_use]
    pub fn child_components(&self) -> Vec<ComponentRef> {
        self.materialized.borrow().iter().map(|c| Rc::clone(&c.component)).collect()
    }

    #[must_use]
    pub fn child_bindings(&self) -> Vec<Rc<dyn Binding>> {
        self.context.bindings()
    }

    /// Called for every vanished child, e.g. to detach its component.
    pub fn set_child_removed_handler(&self, handler: impl Fn(&BoundObject, &ComponentRef) + 'static) {
        *self.on_child_removed.borrow_mut() = Some(Box::new(handler));
    }

    fn is_unchanged(&self, current: &[BoundObject]) -> bool {
        let materialized = self.materialized.borrow();
        materialized.len() == current.len()
            && materialized.iter().zip(current).all(|(child, object)| child.object.ptr_eq(object))
    }

    fn update_children(&self) -> Result<(), BindingError> {
        let current = (self.children)();
        if self.is_unchanged(&current) {
            return Ok(());
        }

        let previous = std::mem::take(&mut *self.materialized.borrow_mut());
        let mut reusable: AHashMap<ObjectKey, Materialized> = AHashMap::with_capacity(previous.len());
        let mut vanished = Vec::new();
        for child in previous {
            let key = child.object.key();
            if reusable.contains_key(&key) {
                vanished.push(child);
            } else {
                reusable.insert(key, child);
            }
        }

        let mut next = Vec::with_capacity(current.len());
        let mut created = 0_usize;
        for (index, object) in current.into_iter().enumerate() {
            if let Some(child) = reusable.remove(&object.key()) {
                next.push(child);
                continue;
            }
            let bound_before = self.bound_components();
            match (self.create_child)(&self.context, &object) {
                Ok(component) => {
                    created += 1;
                    next.push(Materialized { object, component });
                }
                Err(source) => {
                    self.release_partial_child(&bound_before);
                    next.extend(reusable.into_values());
                    next.extend(vanished);
                    *self.materialized.borrow_mut() = next;
                    return Err(BindingError::ContainerChild {
                        index,
                        class: object.type_name(),
                        source: Box::new(source),
                    });
                }
            }
        }
        vanished.extend(reusable.into_values());
        *self.materialized.borrow_mut() = next;

        debug!(
            context = %self.context.name(),
            created,
            removed = vanished.len(),
            "container children changed"
        );
        for child in &vanished {
            self.release_child(child);
        }
        Ok(())
    }

    fn bound_components(&self) -> AHashSet<ComponentKey> {
        self.context
            .bindings()
            .iter()
            .map(|b| ComponentKey::of(&b.bound_component()))
            .collect()
    }

    /// Drop the bindings a failed child factory call left in the nested context.
    fn release_partial_child(&self, bound_before: &AHashSet<ComponentKey>) {
        for binding in self.context.bindings() {
            let component = binding.bound_component();
            if !bound_before.contains(&ComponentKey::of(&component)) {
                self.context.remove_bindings_for_component(&component);
            }
        }
    }

    fn release_child(&self, child: &Materialized) {
        self.context.remove_bindings_for_component(&child.component);
        self.context.remove_bindings_for_pmo(&child.object);
        if let Some(handler) = self.on_child_removed.borrow().as_ref() {
            handler(&child.object, &child.component);
        }
    }
}

impl Binding for ContainerBinding {
    fn update_from_pmo(&self) -> Result<(), BindingError> {
        self.element.update_from_pmo()?;
        self.update_children()?;
        self.context.update_ui()
    }

    fn bound_component(&self) -> ComponentRef {
        self.element.bound_component()
    }

    fn pmo(&self) -> &BoundObject {
        self.element.pmo()
    }

    fn display_messages(&self, messages: &MessageList) -> MessageList {
        let mut shown = self.element.display_messages(messages);
        shown.add_all(&self.context.display_messages(messages));
        shown
    }

    fn release(&self) {
        let children = std::mem::take(&mut *self.materialized.borrow_mut());
        for child in &children {
            self.release_child(child);
        }
        self.context.clear();
        self.element.release();
    }
}

impl fmt::Debug for ContainerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBinding")
            .field("pmo", self.element.pmo())
            .field("children", &self.materialized.borrow().len())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use bindery_reflect::{BoundObject, ClassBuilder, Reflect};
    use tracing_test::traced_test;

    use crate::component::{ComponentRef, WrapperType};
    use crate::context::BindingContext;
    use crate::definition::{AspectDefinition, VisibleAspectDefinition, VisibleType};
    use crate::testing::{RecordingPanel, RecordingWrapper};

    struct Row;

    impl Reflect for Row {
        fn reflect(_: &mut ClassBuilder<Self>) {}
    }

    struct Table;

    impl Reflect for Table {
        fn reflect(_: &mut ClassBuilder<Self>) {}
    }

    #[test]
    #[traced_test]
    fn logs_child_churn() {
        let rows = Rc::new(RefCell::new(vec![BoundObject::new(Row)]));
        let source = Rc::clone(&rows);
        let context = BindingContext::new("table");
        let defs: Vec<Rc<dyn AspectDefinition>> = vec![Rc::new(VisibleAspectDefinition::new(VisibleType::Visible))];
        let panel = RecordingPanel::new();
        let wrapper = RecordingWrapper::with_type(panel, WrapperType::Layout);

        context
            .bind_container(
                &BoundObject::new(Table),
                &defs,
                wrapper,
                move || source.borrow().clone(),
                |_: &BindingContext, _: &BoundObject| {
                    let component: ComponentRef = RecordingPanel::new();
                    Ok(component)
                },
            )
            .unwrap();
        assert!(logs_contain("container children changed"));
        assert!(logs_contain("created=1"));

        rows.borrow_mut().clear();
        context.update_ui().unwrap();
        assert!(logs_contain("removed=1"));
    }
}
