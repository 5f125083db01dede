//! Declarative field metadata.
//!
//! A [`FieldAnnotation`] describes one bound property the way a form
//! declaration would: label, enabled/visible/required modes, tooltip,
//! available values, and whether the property is a value or a button.
//!
//! ```
//! use bindery_binding::{EnabledType, FieldAnnotation, LabelType};
//!
//! let partner_name = FieldAnnotation::field()
//!     .label(LabelType::Static("Name".into()))
//!     .enabled(EnabledType::Dynamic)
//!     .model_attribute("name");
//!
//! let names: Vec<String> = partner_name
//!     .aspect_definitions()
//!     .iter()
//!     .map(|d| d.name().to_owned())
//!     .collect();
//! assert_eq!(names, ["label", "enabled", "visible", "required", "toolTip", ""]);
//! ```

use std::rc::Rc;

use crate::definition::{
    AspectDefinition, AvailableValuesAspectDefinition, AvailableValuesType, ButtonInvokeAspectDefinition,
    EnabledAspectDefinition, EnabledType, LabelAspectDefinition, LabelType, RequiredAspectDefinition,
    RequiredType, ToolTipAspectDefinition, ToolTipType, ValueAspectDefinition, VisibleAspectDefinition,
    VisibleType,
};

/// Property of a presentation model returning its model object.
pub const DEFAULT_MODEL_OBJECT: &str = "modelObject";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    /// A value shown (and usually edited) by a field.
    #[default]
    Value,
    /// An action invoked by a button.
    Button,
}

/// Metadata of one bound property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldAnnotation {
    kind: FieldKind,
    label: LabelType,
    enabled: EnabledType,
    visible: VisibleType,
    required: RequiredType,
    tooltip: ToolTipType,
    available_values: Option<AvailableValuesType>,
    model_object: Option<String>,
    model_attribute: Option<String>,
}

impl FieldAnnotation {
    /// A value field with default modes.
    #[must_use]
    pub fn field() -> Self {
        Self::default()
    }

    /// A button invoking the method named like the property.
    #[must_use]
    pub fn button() -> Self {
        Self {
            kind: FieldKind::Button,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(mut self, label: LabelType) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: EnabledType) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: VisibleType) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn required(mut self, required: RequiredType) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn tooltip(mut self, tooltip: ToolTipType) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Offer choices; the field must then be a choice component.
    #[must_use]
    pub fn available_values(mut self, values: AvailableValuesType) -> Self {
        self.available_values = Some(values);
        self
    }

    /// Read and write the value from `attribute` of the model object.
    ///
    /// An empty attribute means "same name as the property".
    #[must_use]
    pub fn model_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.model_attribute = Some(attribute.into());
        self
    }

    /// Name of the property returning the model object, [`DEFAULT_MODEL_OBJECT`] if unset.
    #[must_use]
    pub fn model_object(mut self, property: impl Into<String>) -> Self {
        self.model_object = Some(property.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The model attribute for `property`, if the value is redirected.
    #[must_use]
    pub fn model_attribute_for(&self, property: &str) -> Option<String> {
        self.model_attribute.as_ref().map(|attribute| {
            if attribute.is_empty() {
                property.to_owned()
            } else {
                attribute.clone()
            }
        })
    }

    #[must_use]
    pub fn model_object_property(&self) -> &str {
        self.model_object.as_deref().unwrap_or(DEFAULT_MODEL_OBJECT)
    }

    /// The definitions this annotation declares, in application order.
    ///
    /// Available values come before the value so a choice component knows
    /// its items when its value is set.
    #[must_use]
    pub fn aspect_definitions(&self) -> Vec<Rc<dyn AspectDefinition>> {
        let mut definitions: Vec<Rc<dyn AspectDefinition>> = vec![
            Rc::new(LabelAspectDefinition::new(self.label.clone())),
            Rc::new(EnabledAspectDefinition::new(self.enabled)),
            Rc::new(VisibleAspectDefinition::new(self.visible)),
        ];
        match self.kind {
            FieldKind::Value => {
                definitions.push(Rc::new(RequiredAspectDefinition::new(self.required, self.enabled)));
                definitions.push(Rc::new(ToolTipAspectDefinition::new(self.tooltip.clone())));
                if let Some(values) = self.available_values {
                    definitions.push(Rc::new(AvailableValuesAspectDefinition::new(values)));
                }
                definitions.push(Rc::new(ValueAspectDefinition::new()));
            }
            FieldKind::Button => {
                definitions.push(Rc::new(ToolTipAspectDefinition::new(self.tooltip.clone())));
                definitions.push(Rc::new(ButtonInvokeAspectDefinition::new()));
            }
        }
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(annotation: &FieldAnnotation) -> Vec<String> {
        annotation
            .aspect_definitions()
            .iter()
            .map(|d| d.name().to_owned())
            .collect()
    }

    #[test]
    fn available_values_precede_value() {
        let annotation = FieldAnnotation::field().available_values(AvailableValuesType::EnumValuesInclNull);
        let names = names(&annotation);
        let items = names.iter().position(|n| n == "availableValues").unwrap();
        let value = names.iter().position(|n| n.is_empty()).unwrap();
        assert!(items < value);
    }

    #[test]
    fn button_has_no_value_or_required() {
        assert_eq!(
            names(&FieldAnnotation::button()),
            ["label", "enabled", "visible", "toolTip", "buttonInvoke"]
        );
    }

    #[test]
    fn empty_model_attribute_means_property_name() {
        let annotation = FieldAnnotation::field().model_attribute("");
        assert_eq!(annotation.model_attribute_for("premium").as_deref(), Some("premium"));
        assert_eq!(annotation.model_object_property(), DEFAULT_MODEL_OBJECT);
        assert_eq!(FieldAnnotation::field().model_attribute_for("premium"), None);
    }
}
