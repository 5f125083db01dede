//! Cross-cutting rules that restrict what models report.

use std::rc::Rc;

use bindery_reflect::BoundObject;

/// A rule applied to every bound property, independent of the model.
///
/// All methods default to "no restriction". A property is visible, writable
/// or mandatory only if every behavior agrees.
pub trait PropertyBehavior {
    fn is_visible(&self, _object: &BoundObject, _property: &str) -> bool {
        true
    }

    fn is_writable(&self, _object: &BoundObject, _property: &str) -> bool {
        true
    }

    fn is_mandatory(&self, _object: &BoundObject, _property: &str) -> bool {
        true
    }
}

/// Supplies the behaviors currently in effect.
pub trait BehaviorProvider {
    fn behaviors(&self) -> Vec<Rc<dyn PropertyBehavior>>;
}

impl BehaviorProvider for Vec<Rc<dyn PropertyBehavior>> {
    fn behaviors(&self) -> Vec<Rc<dyn PropertyBehavior>> {
        self.clone()
    }
}

/// Makes every property read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadOnlyBehavior;

impl PropertyBehavior for ReadOnlyBehavior {
    fn is_writable(&self, _object: &BoundObject, _property: &str) -> bool {
        false
    }
}

pub(crate) fn all_visible(provider: &dyn BehaviorProvider, object: &BoundObject, property: &str) -> bool {
    provider.behaviors().iter().all(|b| b.is_visible(object, property))
}

pub(crate) fn all_writable(provider: &dyn BehaviorProvider, object: &BoundObject, property: &str) -> bool {
    provider.behaviors().iter().all(|b| b.is_writable(object, property))
}

pub(crate) fn all_mandatory(provider: &dyn BehaviorProvider, object: &BoundObject, property: &str) -> bool {
    provider.behaviors().iter().all(|b| b.is_mandatory(object, property))
}
