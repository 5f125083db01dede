//! Named facets of a bound property.

use std::borrow::Cow;

use bindery_reflect::Value;

/// One facet of a bound property: its value, whether it is enabled, its
/// label, and so on.
///
/// An aspect with a value is *static*: dispatchers answer it without
/// consulting the model. An aspect without a value is *dynamic* and is
/// resolved from the model by name (`enabled` on `address` reads
/// `isAddressEnabled`). The value aspect has the empty name.
#[derive(Clone, Debug)]
pub struct Aspect {
    name: Cow<'static, str>,
    value: Option<Value>,
}

impl Aspect {
    pub const VALUE: &'static str = "";
    pub const ENABLED: &'static str = "enabled";
    pub const VISIBLE: &'static str = "visible";
    pub const REQUIRED: &'static str = "required";
    pub const LABEL: &'static str = "label";
    pub const TOOLTIP: &'static str = "toolTip";
    pub const AVAILABLE_VALUES: &'static str = "availableValues";
    /// Whether the value aspect is read-only, as derived by the dispatcher
    /// chain (missing setter, property behaviors).
    pub const DERIVED_READ_ONLY: &'static str = "derived.readonly";

    /// A dynamic aspect.
    #[must_use]
    pub fn of(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// A static aspect carrying `value`.
    #[must_use]
    pub fn with_value(name: impl Into<Cow<'static, str>>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    /// The dynamic value aspect.
    #[must_use]
    pub const fn value_aspect() -> Self {
        Self {
            name: Cow::Borrowed(Self::VALUE),
            value: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used in diagnostics: `"value"` for the value aspect.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn is_value_present(&self) -> bool {
        self.value.is_some()
    }

    /// Whether this is the value aspect.
    #[must_use]
    pub fn is_value_aspect(&self) -> bool {
        self.name.is_empty()
    }
}

pub(crate) fn display_name(name: &str) -> &str {
    if name.is_empty() { "value" } else { name }
}
