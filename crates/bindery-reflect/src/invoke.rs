//! Method invocation strategies.
//!
//! An accessor calls its resolved method through a [`MethodInvoker`]. The
//! preferred [`CompiledInvoker`] binds the method body once and calls it
//! directly. When a method cannot be compiled (late-bound methods), the
//! accessor falls back, permanently and for that accessor only, to the
//! [`ReflectiveInvoker`], which looks the method up by name and checks its
//! call shape on every call. Both strategies behave identically.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::class::{ClassDescriptor, Method, MethodBody, Receiver};
use crate::error::MethodError;
use crate::object::BoundObject;
use crate::value::Value;

/// Which strategy an invoker implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationStrategy {
    Compiled,
    Reflective,
}

/// Calls one resolved method on bound objects.
pub trait MethodInvoker: Send + Sync + fmt::Debug {
    fn strategy(&self) -> InvocationStrategy;

    /// Call the method on `target`, passing `argument` to one-argument methods.
    fn invoke(&self, target: &BoundObject, argument: Option<Value>) -> Result<Value, MethodError>;
}

/// Why a method could not be compiled into a direct adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompileError {
    LateBound,
    ForeignReceiver { declared: &'static str },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LateBound => f.write_str("method is late-bound"),
            Self::ForeignReceiver { declared } => {
                write!(f, "method was registered for receiver {declared}")
            }
        }
    }
}

fn call_body(
    body: &MethodBody,
    method: &str,
    target: &BoundObject,
    argument: Option<Value>,
) -> Result<Value, MethodError> {
    match (body, argument) {
        (MethodBody::Read(f), None) => {
            let guard = target.borrow()?;
            f(&*guard)
        }
        (MethodBody::Mutate(f), None) => {
            let mut guard = target.borrow_mut()?;
            f(&mut *guard)
        }
        (MethodBody::Argument(f), Some(arg)) => {
            let mut guard = target.borrow_mut()?;
            f(&mut *guard, arg)
        }
        (MethodBody::Argument(_), None) => Err(MethodError::Shape {
            method: method.to_owned(),
            reason: "requires an argument",
        }),
        (_, Some(_)) => Err(MethodError::Shape {
            method: method.to_owned(),
            reason: "takes no argument",
        }),
    }
}

/// Direct call of a pre-bound method body.
pub struct CompiledInvoker {
    method: String,
    body: MethodBody,
}

impl CompiledInvoker {
    pub(crate) fn compile(class: &ClassDescriptor, method: &Method) -> Result<Self, CompileError> {
        match method.receiver() {
            Receiver::LateBound => Err(CompileError::LateBound),
            Receiver::Typed(receiver) if receiver != class.value_type() => {
                Err(CompileError::ForeignReceiver {
                    declared: receiver.name(),
                })
            }
            Receiver::Typed(_) => Ok(Self {
                method: method.name().to_owned(),
                body: method.body.clone(),
            }),
        }
    }
}

impl MethodInvoker for CompiledInvoker {
    fn strategy(&self) -> InvocationStrategy {
        InvocationStrategy::Compiled
    }

    fn invoke(&self, target: &BoundObject, argument: Option<Value>) -> Result<Value, MethodError> {
        call_body(&self.body, &self.method, target, argument)
    }
}

impl fmt::Debug for CompiledInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledInvoker")
            .field("method", &self.method)
            .finish()
    }
}

/// Name-based call through the class descriptor.
pub struct ReflectiveInvoker {
    class: Arc<ClassDescriptor>,
    method: String,
}

impl ReflectiveInvoker {
    pub(crate) fn new(class: Arc<ClassDescriptor>, method: impl Into<String>) -> Self {
        Self {
            class,
            method: method.into(),
        }
    }
}

impl MethodInvoker for ReflectiveInvoker {
    fn strategy(&self) -> InvocationStrategy {
        InvocationStrategy::Reflective
    }

    fn invoke(&self, target: &BoundObject, argument: Option<Value>) -> Result<Value, MethodError> {
        let method = self
            .class
            .method(&self.method)
            .ok_or_else(|| MethodError::Missing {
                class: self.class.name(),
                method: self.method.clone(),
            })?;
        if let (Some(expected), Some(arg)) = (method.parameter(), argument.as_ref()) {
            if arg.value_type() != Some(expected) {
                return Err(MethodError::ArgumentType {
                    expected: expected.name(),
                    found: arg.type_name(),
                });
            }
        }
        call_body(&method.body, &self.method, target, argument)
    }
}

impl fmt::Debug for ReflectiveInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectiveInvoker")
            .field("class", &self.class.name())
            .field("method", &self.method)
            .finish()
    }
}

static DEGRADATION_REPORTED: AtomicBool = AtomicBool::new(false);

/// Report that `method` of `class` runs reflectively.
///
/// The first report in the process is a warning; later ones are debug-level.
pub(crate) fn report_degradation(class: &'static str, method: &str, reason: &CompileError) {
    if DEGRADATION_REPORTED.swap(true, Ordering::Relaxed) {
        tracing::debug!(class, method, %reason, "falling back to reflective invocation");
    } else {
        tracing::warn!(
            class,
            method,
            %reason,
            "direct invocation unavailable, falling back to reflective invocation \
             (further occurrences are logged at debug level)"
        );
    }
}

/// Pick the invoker for a resolved method.
pub(crate) fn select(
    class: &Arc<ClassDescriptor>,
    method: &Method,
    compile: bool,
) -> Arc<dyn MethodInvoker> {
    if compile {
        match CompiledInvoker::compile(class, method) {
            Ok(compiled) => return Arc::new(compiled),
            Err(reason) => report_degradation(class.name(), method.name(), &reason),
        }
    }
    Arc::new(ReflectiveInvoker::new(Arc::clone(class), method.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassBuilder, Reflect};
    use crate::value::ValueType;
    use tracing_test::traced_test;

    struct Lamp {
        on: bool,
    }

    impl Reflect for Lamp {
        fn reflect(class: &mut ClassBuilder<Self>) {
            class
                .method("isOn", |l: &Lamp| l.on)
                .method1("setOn", |l: &mut Lamp, on: bool| l.on = on)
                .dynamic_method("getColor", ValueType::of::<String>(), |_| {
                    Ok(Value::new(String::from("amber")))
                });
        }
    }

    fn method(name: &str) -> (Arc<ClassDescriptor>, Method) {
        let class = ClassDescriptor::of::<Lamp>();
        let method = class.method(name).expect("registered").clone();
        (class, method)
    }

    #[test]
    fn typed_methods_compile() {
        let (class, m) = method("isOn");
        let invoker = select(&class, &m, true);
        assert_eq!(invoker.strategy(), InvocationStrategy::Compiled);
        let lamp = BoundObject::new(Lamp { on: true });
        assert!(invoker.invoke(&lamp, None).expect("call").eq_to(&true));
    }

    #[test]
    fn strategies_agree() {
        let (class, set) = method("setOn");
        let (_, get) = method("isOn");
        let lamp = BoundObject::new(Lamp { on: false });
        for compile in [true, false] {
            select(&class, &set, compile)
                .invoke(&lamp, Some(Value::new(compile)))
                .expect("set");
            let read = select(&class, &get, compile).invoke(&lamp, None).expect("get");
            assert!(read.eq_to(&compile));
        }
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let (class, set) = method("setOn");
        let lamp = BoundObject::new(Lamp { on: false });
        for compile in [true, false] {
            let err = select(&class, &set, compile)
                .invoke(&lamp, None)
                .expect_err("missing argument");
            assert!(matches!(err, MethodError::Shape { .. }));
        }
    }

    #[test]
    fn reflective_checks_argument_type() {
        let (class, set) = method("setOn");
        let lamp = BoundObject::new(Lamp { on: false });
        let err = ReflectiveInvoker::new(class, set.name())
            .invoke(&lamp, Some(Value::new(1_u8)))
            .expect_err("wrong type");
        assert!(matches!(err, MethodError::ArgumentType { expected: "bool", .. }));
    }

    #[test]
    #[traced_test]
    fn late_bound_methods_degrade_with_log() {
        let (class, m) = method("getColor");
        let invoker = select(&class, &m, true);
        assert_eq!(invoker.strategy(), InvocationStrategy::Reflective);
        let lamp = BoundObject::new(Lamp { on: false });
        let color = invoker.invoke(&lamp, None).expect("call");
        assert_eq!(color.get::<String>().as_deref(), Some("amber"));
        assert!(logs_contain("reflective invocation"));
    }

    #[test]
    #[traced_test]
    fn repeated_fallbacks_log_at_debug() {
        let (class, m) = method("getColor");
        for _ in 0..2 {
            assert_eq!(select(&class, &m, true).strategy(), InvocationStrategy::Reflective);
        }
        logs_assert(|lines: &[&str]| {
            let repeated = lines.iter().any(|line| {
                line.contains("DEBUG")
                    && line.contains("falling back to reflective invocation")
                    && !line.contains("direct invocation unavailable")
            });
            if repeated {
                Ok(())
            } else {
                Err(String::from("no debug-level fallback line"))
            }
        });
    }

    #[test]
    fn compile_rejects_foreign_receiver() {
        struct Other;
        impl Reflect for Other {
            fn reflect(_: &mut ClassBuilder<Self>) {}
        }
        let (_, m) = method("isOn");
        let other = ClassDescriptor::of::<Other>();
        let err = CompiledInvoker::compile(&other, &m).expect_err("foreign");
        assert!(matches!(err, CompileError::ForeignReceiver { .. }));
    }
}
