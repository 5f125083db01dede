//! Resolved, cached property accessors.
//!
//! A [`PropertyAccessor`] answers, for one `(type, property)` pair, whether
//! the property can be read, written or invoked, and performs those
//! operations on bound objects.
//!
//! # Resolution
//!
//! - read: the zero-argument method `get{P}`, else `is{P}`;
//! - write: the one-argument method `set{P}` whose parameter type equals the
//!   read method's return type (no read method, no write method);
//! - invoke: the zero-argument method named exactly like the property.
//!
//! Each is resolved the first time it is needed and memoized. The invoker
//! for a resolved method is chosen on the first call.
//!
//! # Example
//!
//! ```
//! use bindery_reflect::{BoundObject, ClassBuilder, PropertyAccessor, Reflect, Value};
//!
//! struct Note {
//!     text: String,
//! }
//!
//! impl Reflect for Note {
//!     fn reflect(class: &mut ClassBuilder<Self>) {
//!         class
//!             .method("getText", |n: &Note| n.text.clone())
//!             .method1("setText", |n: &mut Note, t: String| n.text = t);
//!     }
//! }
//!
//! let note = BoundObject::new(Note { text: "a".into() });
//! let text = PropertyAccessor::of::<Note>("text");
//! assert!(text.can_read() && text.can_write() && !text.can_invoke());
//!
//! text.set_property_value(&note, Value::new(String::from("b"))).unwrap();
//! let value = text.get_property_value(&note).unwrap();
//! assert_eq!(value.get::<String>().as_deref(), Some("b"));
//! ```

use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};

use crate::cache::SnapshotCache;
use crate::class::{ClassDescriptor, Method, Reflect};
use crate::config::InvocationMode;
use crate::error::{MethodError, ReflectError};
use crate::invoke::{self, InvocationStrategy, MethodInvoker};
use crate::naming;
use crate::object::BoundObject;
use crate::value::{Value, ValueType};

static ACCESSORS: LazyLock<SnapshotCache<(TypeId, String), PropertyAccessor>> =
    LazyLock::new(SnapshotCache::new);

/// A resolved method plus its lazily chosen invoker.
struct Resolved {
    method: Method,
    invoker: OnceLock<Arc<dyn MethodInvoker>>,
}

impl Resolved {
    fn new(method: &Method) -> Self {
        Self {
            method: method.clone(),
            invoker: OnceLock::new(),
        }
    }
}

enum ReadLookup {
    Found(Resolved),
    Void { method: String },
    Missing,
}

/// Accessor for one property of one type.
pub struct PropertyAccessor {
    class: Arc<ClassDescriptor>,
    property: String,
    mode: InvocationMode,
    read: OnceLock<ReadLookup>,
    write: OnceLock<Option<Resolved>>,
    invoke: OnceLock<Option<Resolved>>,
}

impl PropertyAccessor {
    /// The process-wide accessor for `property` of the type described by `class`.
    #[must_use]
    pub fn get(class: &Arc<ClassDescriptor>, property: &str) -> Arc<Self> {
        let key = (class.value_type().id(), property.to_owned());
        ACCESSORS.get_or_insert_with(key, || {
            Self::with_mode(Arc::clone(class), property, InvocationMode::global())
        })
    }

    /// The process-wide accessor for `property` of `T`.
    #[must_use]
    pub fn of<T: Reflect>(property: &str) -> Arc<Self> {
        Self::get(&ClassDescriptor::of::<T>(), property)
    }

    /// The process-wide accessor for `property` of the object's type.
    #[must_use]
    pub fn for_object(object: &BoundObject, property: &str) -> Arc<Self> {
        Self::get(object.class(), property)
    }

    /// An unshared accessor using `mode`.
    #[must_use]
    pub fn with_mode(class: Arc<ClassDescriptor>, property: &str, mode: InvocationMode) -> Self {
        Self {
            class,
            property: property.to_owned(),
            mode,
            read: OnceLock::new(),
            write: OnceLock::new(),
            invoke: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    fn read_lookup(&self) -> &ReadLookup {
        self.read.get_or_init(|| {
            let found = naming::getter_names(&self.property)
                .into_iter()
                .find_map(|name| self.class.method(&name).filter(|m| m.is_nullary()));
            match found {
                Some(method) if method.returns().is_unit() => ReadLookup::Void {
                    method: method.name().to_owned(),
                },
                Some(method) => ReadLookup::Found(Resolved::new(method)),
                None => ReadLookup::Missing,
            }
        })
    }

    fn write_lookup(&self) -> Option<&Resolved> {
        self.write
            .get_or_init(|| {
                let ReadLookup::Found(read) = self.read_lookup() else {
                    return None;
                };
                let returns = read.method.returns();
                self.class
                    .method(&naming::setter_name(&self.property))
                    .filter(|m| m.parameter() == Some(returns))
                    .map(Resolved::new)
            })
            .as_ref()
    }

    fn invoke_lookup(&self) -> Option<&Resolved> {
        self.invoke
            .get_or_init(|| {
                self.class
                    .method(&self.property)
                    .filter(|m| m.is_nullary())
                    .map(Resolved::new)
            })
            .as_ref()
    }

    #[must_use]
    pub fn can_read(&self) -> bool {
        matches!(self.read_lookup(), ReadLookup::Found(_))
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.write_lookup().is_some()
    }

    #[must_use]
    pub fn can_invoke(&self) -> bool {
        self.invoke_lookup().is_some()
    }

    fn readable(&self) -> Result<&Resolved, ReflectError> {
        match self.read_lookup() {
            ReadLookup::Found(resolved) => Ok(resolved),
            ReadLookup::Void { method } => Err(ReflectError::VoidGetter {
                class: self.class.name(),
                property: self.property.clone(),
                method: method.clone(),
            }),
            ReadLookup::Missing => Err(ReflectError::NotReadable {
                class: self.class.name(),
                property: self.property.clone(),
            }),
        }
    }

    /// Declared type of the property (the read method's return type).
    pub fn value_type(&self) -> Result<ValueType, ReflectError> {
        self.readable().map(|r| r.method.returns())
    }

    pub fn get_property_value(&self, object: &BoundObject) -> Result<Value, ReflectError> {
        let read = self.readable()?;
        self.call(read, object, None)
    }

    pub fn set_property_value(&self, object: &BoundObject, value: Value) -> Result<(), ReflectError> {
        let write = self.write_lookup().ok_or_else(|| ReflectError::NotWritable {
            class: self.class.name(),
            property: self.property.clone(),
        })?;
        self.call(write, object, Some(value)).map(drop)
    }

    /// Call the method named like the property, returning its result.
    pub fn invoke(&self, object: &BoundObject) -> Result<Value, ReflectError> {
        let invoke = self.invoke_lookup().ok_or_else(|| ReflectError::NotInvokable {
            class: self.class.name(),
            property: self.property.clone(),
        })?;
        self.call(invoke, object, None)
    }

    fn call(
        &self,
        resolved: &Resolved,
        object: &BoundObject,
        argument: Option<Value>,
    ) -> Result<Value, ReflectError> {
        let result = if object.class().value_type() == self.class.value_type() {
            let invoker = resolved.invoker.get_or_init(|| {
                invoke::select(&self.class, &resolved.method, self.mode.compiles())
            });
            invoker.invoke(object, argument)
        } else {
            Err(MethodError::ReceiverType {
                expected: self.class.name(),
            })
        };
        result.map_err(|source| ReflectError::Invocation {
            class: self.class.name(),
            property: self.property.clone(),
            source,
        })
    }

    /// Strategy used for reads, once the first read has happened.
    #[must_use]
    pub fn read_strategy(&self) -> Option<InvocationStrategy> {
        match self.read.get() {
            Some(ReadLookup::Found(resolved)) => resolved.invoker.get().map(|i| i.strategy()),
            _ => None,
        }
    }
}

impl fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("class", &self.class.name())
            .field("property", &self.property)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;

    #[derive(Default)]
    struct Form {
        name: String,
        nickname: Option<String>,
        active: bool,
        saves: u32,
    }

    impl Reflect for Form {
        fn reflect(class: &mut ClassBuilder<Self>) {
            class
                .method("getName", |f: &Form| f.name.clone())
                .method1("setName", |f: &mut Form, n: String| f.name = n)
                .method("getNickname", |f: &Form| f.nickname.clone())
                .method1("setNickname", |f: &mut Form, n: Option<String>| f.nickname = n)
                .method("isActive", |f: &Form| f.active)
                .method1("setActive", |f: &mut Form, a: String| f.active = !a.is_empty())
                .method("getNothing", |_: &Form| ())
                .method_mut("save", |f: &mut Form| f.saves += 1)
                .try_method("getBroken", |_: &Form| -> Result<u32, MethodError> {
                    Err(MethodError::failed("database offline"))
                });
        }
    }

    fn form() -> BoundObject {
        BoundObject::new(Form::default())
    }

    #[test]
    fn cache_returns_same_accessor() {
        let a = PropertyAccessor::of::<Form>("name");
        let b = PropertyAccessor::of::<Form>("name");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &PropertyAccessor::of::<Form>("nickname")));
    }

    #[test]
    fn getter_prefixes() {
        assert!(PropertyAccessor::of::<Form>("name").can_read());
        assert!(PropertyAccessor::of::<Form>("active").can_read());
        assert_eq!(
            PropertyAccessor::of::<Form>("active").value_type().expect("readable"),
            ValueType::of::<bool>()
        );
    }

    #[test]
    fn setter_must_match_getter_type() {
        let active = PropertyAccessor::of::<Form>("active");
        assert!(active.can_read());
        assert!(!active.can_write());
    }

    #[test]
    fn no_getter_means_no_setter() {
        let p = PropertyAccessor::of::<Form>("missing");
        assert!(!p.can_read());
        assert!(!p.can_write());
        assert!(!p.can_invoke());
        let err = p.get_property_value(&form()).expect_err("not readable");
        assert!(matches!(err, ReflectError::NotReadable { .. }));
        assert!(err.to_string().contains("missing"));
        assert!(err.to_string().contains("Form"));
    }

    #[test]
    fn void_getter_is_not_readable() {
        let p = PropertyAccessor::of::<Form>("nothing");
        assert!(!p.can_read());
        let err = p.get_property_value(&form()).expect_err("void");
        assert!(matches!(err, ReflectError::VoidGetter { ref method, .. } if method == "getNothing"));
    }

    #[test]
    fn invoke_uses_literal_name() {
        let obj = form();
        let save = PropertyAccessor::of::<Form>("save");
        assert!(save.can_invoke());
        assert!(!save.can_read());
        save.invoke(&obj).expect("invoke");
        save.invoke(&obj).expect("invoke");
        assert_eq!(obj.with(|f: &Form| f.saves), Some(2));
    }

    #[test]
    fn optional_round_trip_with_none() {
        let obj = form();
        let p = PropertyAccessor::of::<Form>("nickname");
        p.set_property_value(&obj, Value::new(Some(String::from("bo"))))
            .expect("set");
        assert!(p.get_property_value(&obj).expect("get").eq_to(&Some(String::from("bo"))));
        p.set_property_value(&obj, Value::new(None::<String>)).expect("set");
        assert!(p.get_property_value(&obj).expect("get").eq_to(&None::<String>));
    }

    #[test]
    fn invocation_errors_name_class_and_property() {
        let err = PropertyAccessor::of::<Form>("broken")
            .get_property_value(&form())
            .expect_err("fails");
        let ReflectError::Invocation { property, class, source } = &err else {
            panic!("expected invocation error, got {err:?}");
        };
        assert_eq!(property, "broken");
        assert!(class.ends_with("Form"));
        assert_eq!(source.to_string(), "database offline");
    }

    #[test]
    fn wrong_argument_type_is_an_invocation_error() {
        let err = PropertyAccessor::of::<Form>("name")
            .set_property_value(&form(), Value::new(3_u8))
            .expect_err("wrong type");
        assert!(matches!(
            err,
            ReflectError::Invocation { source: MethodError::ArgumentType { .. }, .. }
        ));
    }

    #[test]
    fn foreign_object_is_rejected() {
        struct Stranger;
        impl Reflect for Stranger {
            fn reflect(_: &mut ClassBuilder<Self>) {}
        }
        let err = PropertyAccessor::of::<Form>("name")
            .get_property_value(&BoundObject::new(Stranger))
            .expect_err("different type");
        assert!(matches!(
            err,
            ReflectError::Invocation { source: MethodError::ReceiverType { .. }, .. }
        ));
    }

    #[test]
    fn reentrant_write_while_borrowed_fails_cleanly() {
        let cell = std::rc::Rc::new(std::cell::RefCell::new(Form::default()));
        let obj = BoundObject::from_rc(std::rc::Rc::clone(&cell));
        let _guard = cell.borrow();
        let err = PropertyAccessor::of::<Form>("name")
            .set_property_value(&obj, Value::new(String::from("x")))
            .expect_err("borrowed");
        assert!(matches!(
            err,
            ReflectError::Invocation { source: MethodError::Borrowed { .. }, .. }
        ));
    }

    #[test]
    fn modes_behave_identically() {
        for mode in [InvocationMode::Compiled, InvocationMode::Reflective] {
            let obj = form();
            let p = PropertyAccessor::with_mode(ClassDescriptor::of::<Form>(), "name", mode);
            p.set_property_value(&obj, Value::new(String::from("z"))).expect("set");
            assert!(p.get_property_value(&obj).expect("get").eq_to(&String::from("z")));
            let expected = match mode {
                InvocationMode::Compiled => InvocationStrategy::Compiled,
                InvocationMode::Reflective => InvocationStrategy::Reflective,
            };
            assert_eq!(p.read_strategy(), Some(expected));
        }
    }
}
