use bindery_reflect::{BoundObject, PropertyAccessor, Value, ValueType};

use crate::aspect::Aspect;
use crate::dispatcher::{PropertyDispatcher, accessor_error, read_member, write_member};
use crate::error::DispatchError;

/// Redirects the value aspect to an attribute of a separate model object.
///
/// Only the value aspect (and whether it is read-only) is redirected. All
/// other aspects, and requests the model object cannot answer, are
/// delegated.
pub struct ModelObjectDispatcher {
    model: BoundObject,
    attribute: String,
    next: Box<dyn PropertyDispatcher>,
}

impl ModelObjectDispatcher {
    #[must_use]
    pub fn new(model: BoundObject, attribute: impl Into<String>, next: Box<dyn PropertyDispatcher>) -> Self {
        Self {
            model,
            attribute: attribute.into(),
            next,
        }
    }

    fn accessor(&self) -> std::sync::Arc<PropertyAccessor> {
        PropertyAccessor::for_object(&self.model, &self.attribute)
    }
}

impl PropertyDispatcher for ModelObjectDispatcher {
    fn property(&self) -> &str {
        self.next.property()
    }

    fn bound_object(&self) -> Option<BoundObject> {
        self.next.bound_object()
    }

    fn value_type(&self) -> Result<ValueType, DispatchError> {
        let accessor = self.accessor();
        if accessor.can_read() {
            accessor
                .value_type()
                .map_err(|err| accessor_error(&self.model, &self.attribute, err))
        } else {
            self.next.value_type()
        }
    }

    fn pull(&self, aspect: &Aspect) -> Result<Value, DispatchError> {
        if aspect.is_value_aspect() {
            if let Some(result) = read_member(&self.model, &self.attribute) {
                return result;
            }
        } else if aspect.name() == Aspect::DERIVED_READ_ONLY {
            let accessor = self.accessor();
            if accessor.can_read() {
                return Ok(Value::new(!accessor.can_write()));
            }
        }
        self.next.pull(aspect)
    }

    fn push(&self, aspect: &Aspect) -> Result<(), DispatchError> {
        if aspect.is_value_aspect() {
            if let Some(value) = aspect.value() {
                if let Some(result) = write_member(&self.model, &self.attribute, value) {
                    return result;
                }
            }
        }
        self.next.push(aspect)
    }

    fn is_push_available(&self, aspect: &Aspect) -> bool {
        (aspect.is_value_aspect() && aspect.is_value_present() && self.accessor().can_write())
            || self.next.is_push_available(aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{ReflectionDispatcher, TerminalDispatcher};
    use bindery_reflect::{ClassBuilder, Reflect};

    #[derive(Default)]
    struct Contract {
        number: String,
    }

    impl Reflect for Contract {
        fn reflect(class: &mut ClassBuilder<Self>) {
            class
                .method("getNumber", |c: &Contract| c.number.clone())
                .method1("setNumber", |c: &mut Contract, n: String| c.number = n);
        }
    }

    struct ContractPmo;

    impl Reflect for ContractPmo {
        fn reflect(class: &mut ClassBuilder<Self>) {
            class.method("isContractNumberEnabled", |_: &ContractPmo| false);
        }
    }

    fn chain(pmo: &BoundObject, model: &BoundObject) -> ReflectionDispatcher {
        let terminal = TerminalDispatcher::new("contractNumber", pmo.type_name());
        let model = ModelObjectDispatcher::new(model.clone(), "number", Box::new(terminal));
        ReflectionDispatcher::new(pmo.clone(), "contractNumber", Box::new(model))
    }

    #[test]
    fn value_goes_to_model_other_aspects_to_pmo() {
        let pmo = BoundObject::new(ContractPmo);
        let model = BoundObject::new(Contract {
            number: "C-1".into(),
        });
        let d = chain(&pmo, &model);

        assert!(d.pull(&Aspect::value_aspect()).unwrap().eq_to(&String::from("C-1")));
        assert!(d.pull(&Aspect::of(Aspect::ENABLED)).unwrap().eq_to(&false));
        assert!(d.pull(&Aspect::of(Aspect::DERIVED_READ_ONLY)).unwrap().eq_to(&false));
        assert_eq!(d.value_type().unwrap(), ValueType::of::<String>());
        assert_eq!(d.bound_object(), Some(pmo));

        d.push(&Aspect::with_value(Aspect::VALUE, Value::new(String::from("C-2"))))
            .unwrap();
        assert_eq!(model.with(|c: &Contract| c.number.clone()).as_deref(), Some("C-2"));
    }
}
