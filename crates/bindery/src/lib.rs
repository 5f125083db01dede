#![forbid(unsafe_code)]

//! bindery: bind presentation model properties to UI components.
//!
//! This crate re-exports the bindery layers:
//! - [`reflect`] resolves named properties and methods on plain Rust types
//! - [`message`] carries validation messages addressed to object properties
//! - [`binding`] turns properties into aspects and keeps components in sync
//!
//! Most code only needs the [`prelude`].

pub use bindery_binding as binding;
pub use bindery_message as message;
pub use bindery_reflect as reflect;

pub use bindery_binding::{BindingContext, BindingError, DispatchError, FieldAnnotation};
pub use bindery_message::{Message, MessageList, Severity};
pub use bindery_reflect::{BoundObject, ClassBuilder, Reflect, ReflectError, Value};

pub mod prelude {
    //! The types needed to declare and bind a presentation model.

    pub use bindery_binding::{
        AspectDefinition, AvailableValuesType, Binding, BindingContext, BindingError, Component,
        ComponentRef, ComponentWrapper, EnabledType, FieldAnnotation, LabelType, ModelBinding,
        PropertyBehavior, PropertyDispatcherFactory, RequiredType, ToolTipType, VisibleType, WrapperType,
    };
    pub use bindery_message::{Marker, Message, MessageList, ObjectProperty, Severity};
    pub use bindery_reflect::{
        BoundObject, ClassBuilder, EnumValues, InvocationMode, Reflect, Value, register_enum_values,
    };
}
