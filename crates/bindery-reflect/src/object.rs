//! Shared handles to bound presentation model objects.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use crate::class::{ClassDescriptor, Reflect};
use crate::error::MethodError;

/// Identity of a bound object, stable for as long as the object lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(usize);

/// A shared, identity-compared handle to a presentation model object.
///
/// Bound objects are `Rc<RefCell<_>>` underneath: getters borrow, setters
/// and actions borrow mutably. Keep a typed `Rc<RefCell<T>>` around (see
/// [`BoundObject::from_rc`]) to change the model directly.
#[derive(Clone)]
pub struct BoundObject {
    cell: Rc<RefCell<dyn Any>>,
    class: Arc<ClassDescriptor>,
}

impl BoundObject {
    /// Move `value` into a new bound object.
    #[must_use]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self::from_rc(Rc::new(RefCell::new(value)))
    }

    /// Share an existing model cell.
    #[must_use]
    pub fn from_rc<T: Reflect>(cell: Rc<RefCell<T>>) -> Self {
        let cell: Rc<RefCell<dyn Any>> = cell;
        Self {
            cell,
            class: ClassDescriptor::of::<T>(),
        }
    }

    #[must_use]
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    /// Fully qualified name of the object's type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.class.name()
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey(Rc::as_ptr(&self.cell).cast::<()>() as usize)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.class.value_type().is::<T>()
    }

    /// Run `f` against the object as a `&T`.
    ///
    /// Returns `None` if the object is not a `T` or is currently borrowed mutably.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.cell.try_borrow().ok()?;
        guard.downcast_ref::<T>().map(f)
    }

    /// Run `f` against the object as a `&mut T`.
    ///
    /// Returns `None` if the object is not a `T` or is currently borrowed.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.cell.try_borrow_mut().ok()?;
        guard.downcast_mut::<T>().map(f)
    }

    pub(crate) fn borrow(&self) -> Result<Ref<'_, dyn Any>, MethodError> {
        self.cell.try_borrow().map_err(|_| MethodError::Borrowed {
            class: self.type_name(),
        })
    }

    pub(crate) fn borrow_mut(&self) -> Result<RefMut<'_, dyn Any>, MethodError> {
        self.cell.try_borrow_mut().map_err(|_| MethodError::Borrowed {
            class: self.type_name(),
        })
    }
}

impl PartialEq for BoundObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for BoundObject {}

impl Hash for BoundObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for BoundObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundObject({}@{:#x})", self.type_name(), self.key().0)
    }
}
