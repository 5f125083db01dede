//! Immutable validation messages.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use bindery_reflect::BoundObject;

use crate::object_property::ObjectProperty;
use crate::severity::Severity;

/// Opaque tag attached to messages, e.g. to group them by origin.
///
/// A marker flagged as `required_information_missing` identifies messages
/// that only report empty mandatory fields.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    name: Cow<'static, str>,
    required_information_missing: bool,
}

impl Marker {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            required_information_missing: false,
        }
    }

    /// Marker for "mandatory field is empty" messages.
    #[must_use]
    pub const fn required_information_missing(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            required_information_missing: true,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            required_information_missing: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_required_information_missing(&self) -> bool {
        self.required_information_missing
    }
}

/// A validation result: severity, text, optional code, the properties it is
/// about and a set of markers.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    severity: Severity,
    text: String,
    code: Option<String>,
    invalid_object_properties: Vec<ObjectProperty>,
    markers: BTreeSet<Marker>,
}

impl Message {
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self::builder(text, severity).create()
    }

    #[must_use]
    pub fn new_error(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::builder(text, Severity::Error).code(code).create()
    }

    #[must_use]
    pub fn new_warning(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::builder(text, Severity::Warning).code(code).create()
    }

    #[must_use]
    pub fn new_info(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::builder(text, Severity::Info).code(code).create()
    }

    #[must_use]
    pub fn builder(text: impl Into<String>, severity: Severity) -> MessageBuilder {
        MessageBuilder {
            message: Self {
                severity,
                text: text.into(),
                code: None,
                invalid_object_properties: Vec::new(),
                markers: BTreeSet::new(),
            },
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn invalid_object_properties(&self) -> &[ObjectProperty] {
        &self.invalid_object_properties
    }

    #[must_use]
    pub fn markers(&self) -> &BTreeSet<Marker> {
        &self.markers
    }

    #[must_use]
    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }

    #[must_use]
    pub fn is_required_information_missing(&self) -> bool {
        self.markers.iter().any(Marker::is_required_information_missing)
    }

    /// Whether the message concerns `object`, regardless of property.
    #[must_use]
    pub fn concerns(&self, object: &BoundObject) -> bool {
        self.invalid_object_properties
            .iter()
            .any(|op| op.bound_object() == object)
    }

    /// Whether the message concerns `property` of `object`.
    #[must_use]
    pub fn concerns_property(&self, object: &BoundObject, property: &str) -> bool {
        self.invalid_object_properties
            .iter()
            .any(|op| op.bound_object() == object && op.property() == Some(property))
    }

    /// Whether the message concerns element `index` of `property` of `object`.
    #[must_use]
    pub fn concerns_index(&self, object: &BoundObject, property: &str, index: usize) -> bool {
        self.invalid_object_properties.iter().any(|op| {
            op.bound_object() == object && op.property() == Some(property) && op.index() == Some(index)
        })
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("severity", &self.severity)
            .field("code", &self.code)
            .field("text", &self.text)
            .field("properties", &self.invalid_object_properties)
            .field("markers", &self.markers)
            .finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, " {}", self.text)
    }
}

/// Builder for [`Message`].
#[derive(Debug)]
#[must_use = "call create() to obtain the message"]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn invalid_object_property(mut self, property: ObjectProperty) -> Self {
        self.message.invalid_object_properties.push(property);
        self
    }

    /// Shorthand for `invalid_object_property(ObjectProperty::new(object, property))`.
    pub fn invalid_object_with_properties<I, S>(mut self, object: &BoundObject, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.invalid_object_properties.extend(
            properties
                .into_iter()
                .map(|p| ObjectProperty::new(object, p)),
        );
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.message.markers.insert(marker);
        self
    }

    pub fn markers(mut self, markers: impl IntoIterator<Item = Marker>) -> Self {
        self.message.markers.extend(markers);
        self
    }

    #[must_use]
    pub fn create(self) -> Message {
        self.message
    }
}
