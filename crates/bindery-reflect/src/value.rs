//! Type-erased values flowing between models and components.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Runtime type tag of a value, the stand-in for a class object.
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    /// Type tag for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (as reported by [`std::any::type_name`]).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Whether this is the unit type, i.e. "returns nothing".
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.is::<()>()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A cheaply clonable, type-erased value.
///
/// Values are shared (`Rc`) and therefore confined to the UI thread. The
/// distinguished [`Value::null`] stands for "no value", e.g. the empty entry
/// of a choice list. Properties whose domain includes "nothing" should model
/// it as `Option<T>` instead; `Value::new(None::<T>)` is a regular value.
#[derive(Clone)]
pub struct Value {
    inner: Option<Rc<dyn Any>>,
    value_type: Option<ValueType>,
}

impl Value {
    /// Wrap `value`.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            inner: Some(Rc::new(value)),
            value_type: Some(ValueType::of::<T>()),
        }
    }

    /// The "no value" marker.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            inner: None,
            value_type: None,
        }
    }

    /// The unit value returned by methods without a result.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Type of the wrapped value; `None` for [`Value::null`].
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Type name for diagnostics (`"null"` for [`Value::null`]).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.value_type.map_or("null", |t| t.name())
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value_type.is_some_and(|t| t.is::<T>())
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Clone the wrapped value out if it is a `T`.
    #[must_use]
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Compare the wrapped value against `expected`.
    #[must_use]
    pub fn eq_to<T: Any + PartialEq>(&self, expected: &T) -> bool {
        self.downcast_ref::<T>() == Some(expected)
    }

    /// Identity comparison: both values share the same allocation, or both are null.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.downcast_ref::<String>() {
            return write!(f, "Value({s:?})");
        }
        if let Some(b) = self.downcast_ref::<bool>() {
            return write!(f, "Value({b})");
        }
        write!(f, "Value(<{}>)", self.type_name())
    }
}
