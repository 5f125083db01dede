#![forbid(unsafe_code)]

//! Aspect dispatch and binding lifecycle for bindery.
//!
//! A bound property is split into [`Aspect`]s (value, enabled, visible,
//! required, label, ...). [`AspectDefinition`]s decide how each aspect moves
//! between model and component; a chain of [`PropertyDispatcher`]s decides
//! where its value comes from. A [`BindingContext`] owns the resulting
//! bindings and refreshes them together.
//!
//! # Invariants
//!
//! 1. Each component has at most one binding per context.
//! 2. Within one binding, aspects are applied in declaration order.
//! 3. Dispatchers delegate every aspect they do not recognize.
//! 4. `update_ui` is not transactional: the first error stops the pass and
//!    bindings stay registered.
//! 5. Component callbacks never keep a context alive.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Aspect unresolved | Model misses the dynamic member | `BindingError::AspectApplication` naming aspect, property, class |
//! | Write refused | No setter, or a behavior denies writing | `DispatchError::NotWritable` / `PushDenied` from the listener |
//! | Child creation fails | Child factory error | `BindingError::ContainerChild`, previous children kept |

pub mod annotation;
pub mod aspect;
pub mod behavior;
pub mod binding;
pub mod component;
pub mod container;
pub mod context;
pub mod definition;
pub mod dispatcher;
pub mod error;
pub mod testing;

pub use annotation::{DEFAULT_MODEL_OBJECT, FieldAnnotation, FieldKind};
pub use aspect::Aspect;
pub use behavior::{BehaviorProvider, PropertyBehavior, ReadOnlyBehavior};
pub use binding::{Binding, ElementBinding};
pub use component::{
    ClickListener, Clickable, Component, ComponentKey, ComponentRef, ComponentWrapper, HasItems, HasValue,
    ValueListener, WrapperType,
};
pub use container::{ChildFactory, ChildRemovedHandler, ChildrenProvider, ContainerBinding};
pub use context::BindingContext;
pub use definition::{
    ApplicableTypeAspectDefinition, AspectDefinition, AvailableValuesAspectDefinition, AvailableValuesType,
    ButtonInvokeAspectDefinition, CompositeAspectDefinition, EnabledAspectDefinition, EnabledType,
    LabelAspectDefinition, LabelType, ModelChanged, RequiredAspectDefinition, RequiredType,
    ToolTipAspectDefinition, ToolTipType, UiUpdater, ValueAspectDefinition, VisibleAspectDefinition,
    VisibleType,
};
pub use dispatcher::{ModelBinding, PropertyDispatcher, PropertyDispatcherFactory};
pub use error::{BindingError, DispatchError, NO_BOUND_OBJECT};
