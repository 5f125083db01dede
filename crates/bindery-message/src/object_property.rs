use std::fmt;

use bindery_reflect::BoundObject;

/// The `(object, property, index)` a message is about.
///
/// `property` is `None` when the message concerns the object as a whole;
/// `index` addresses one element of a list-valued property.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectProperty {
    object: BoundObject,
    property: Option<String>,
    index: Option<usize>,
}

impl ObjectProperty {
    /// The object as a whole.
    #[must_use]
    pub fn object(object: &BoundObject) -> Self {
        Self {
            object: object.clone(),
            property: None,
            index: None,
        }
    }

    #[must_use]
    pub fn new(object: &BoundObject, property: impl Into<String>) -> Self {
        Self {
            object: object.clone(),
            property: Some(property.into()),
            index: None,
        }
    }

    #[must_use]
    pub fn indexed(object: &BoundObject, property: impl Into<String>, index: usize) -> Self {
        Self {
            object: object.clone(),
            property: Some(property.into()),
            index: Some(index),
        }
    }

    #[must_use]
    pub fn bound_object(&self) -> &BoundObject {
        &self.object
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }
}

impl fmt::Debug for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.object)?;
        if let Some(property) = &self.property {
            write!(f, ".{property}")?;
        }
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}
