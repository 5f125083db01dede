use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_binding::testing::{RecordingButton, RecordingField, RecordingPanel, RecordingWrapper};
use bindery_binding::{
    AspectDefinition, AvailableValuesType, Binding, BindingContext, BindingError, ButtonInvokeAspectDefinition,
    ComponentRef, ComponentWrapper, DispatchError, EnabledAspectDefinition, EnabledType, FieldAnnotation,
    LabelType, PropertyBehavior, PropertyDispatcherFactory, ReadOnlyBehavior, RequiredType, ToolTipType,
    ValueAspectDefinition, VisibleAspectDefinition, VisibleType,
};
use bindery_message::{Message, MessageList, ObjectProperty, Severity};
use bindery_reflect::{BoundObject, ClassBuilder, EnumValues, Reflect, Value, register_enum_values};

#[derive(Default)]
struct TextPmo {
    text: String,
}

impl Reflect for TextPmo {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class
            .method("getText", |p: &TextPmo| p.text.clone())
            .method1("setText", |p: &mut TextPmo, t: String| p.text = t)
            .method("getTextToolTip", |p: &TextPmo| format!("{} characters", p.text.len()));
    }
}

struct XPmo;

impl Reflect for XPmo {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class.method("getX", |_: &XPmo| String::from("x"));
    }
}

fn text_model(text: &str) -> (Rc<RefCell<TextPmo>>, BoundObject) {
    let cell = Rc::new(RefCell::new(TextPmo { text: text.into() }));
    let pmo = BoundObject::from_rc(Rc::clone(&cell));
    (cell, pmo)
}

fn recording_field() -> (Rc<RecordingField>, Rc<RecordingWrapper>) {
    let field = RecordingField::new();
    let wrapper = RecordingWrapper::new(field.clone());
    (field, wrapper)
}

fn definitions(list: Vec<Rc<dyn AspectDefinition>>) -> Vec<Rc<dyn AspectDefinition>> {
    list
}

#[test]
fn simple_binding_follows_the_model() {
    let (cell, pmo) = text_model("a");
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("simple");
    let defs = definitions(vec![
        Rc::new(VisibleAspectDefinition::new(VisibleType::Visible)),
        Rc::new(ValueAspectDefinition::new()),
    ]);

    context.bind(&pmo, "text", &defs, wrapper.clone()).unwrap();
    context.update_ui().unwrap();
    assert_eq!(field.text().as_deref(), Some("a"));
    assert_eq!(wrapper.visible(), Some(true));
    assert!(!field.is_read_only());

    cell.borrow_mut().text = "b".into();
    context.update_ui().unwrap();
    assert_eq!(field.text().as_deref(), Some("b"));
    assert_eq!(context.len(), 1);
}

#[test]
fn unresolved_dynamic_aspect_names_property_and_class() {
    let pmo = BoundObject::new(XPmo);
    let (_field, wrapper) = recording_field();
    let wrapper: Rc<dyn ComponentWrapper> = wrapper;
    let dispatcher = PropertyDispatcherFactory::new().create(&pmo, "x", None);

    let update = EnabledAspectDefinition::new(EnabledType::Dynamic).create_ui_updater(&dispatcher, &wrapper);
    let err = update().unwrap_err();
    match &err {
        BindingError::AspectApplication {
            aspect,
            property,
            class,
            ..
        } => {
            assert_eq!(aspect, "enabled");
            assert_eq!(property, "x");
            assert!(class.ends_with("XPmo"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        err.dispatch_error(),
        Some(DispatchError::Unresolved { aspect, .. }) if aspect == "enabled"
    ));
}

#[test]
fn failed_initial_update_registers_nothing() {
    let pmo = BoundObject::new(XPmo);
    let (_field, wrapper) = recording_field();
    let context = BindingContext::new("failing");
    let defs = definitions(vec![Rc::new(EnabledAspectDefinition::new(EnabledType::Dynamic))]);

    let err = context.bind(&pmo, "x", &defs, wrapper).unwrap_err();
    assert!(err.to_string().contains("enabled"));
    assert!(context.is_empty());
}

#[test]
fn failed_bind_leaves_no_live_listeners() {
    let (cell, pmo) = text_model("kept");
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("failing");
    let rounds = Rc::new(Cell::new(0));
    let seen = Rc::clone(&rounds);
    context.set_after_update_handler(move |_| seen.set(seen.get() + 1));
    let defs = definitions(vec![
        Rc::new(ValueAspectDefinition::new()),
        Rc::new(EnabledAspectDefinition::new(EnabledType::Dynamic)),
    ]);

    assert!(context.bind(&pmo, "text", &defs, wrapper.clone()).is_err());
    field.enter(Value::new(String::from("leaked"))).unwrap();
    assert_eq!(cell.borrow().text, "kept");
    assert_eq!(rounds.get(), 0);

    let working = definitions(vec![Rc::new(ValueAspectDefinition::new())]);
    context.bind(&pmo, "text", &working, wrapper).unwrap();
    field.enter(Value::new(String::from("typed"))).unwrap();
    assert_eq!(cell.borrow().text, "typed");
    assert_eq!(rounds.get(), 1, "only the live binding announces the change");
}

#[test]
fn partial_model_update_registration_is_detached() {
    let (cell, pmo) = text_model("kept");
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("partial");
    let defs = definitions(vec![
        Rc::new(ValueAspectDefinition::new()),
        Rc::new(ButtonInvokeAspectDefinition::new()),
    ]);

    let err = context.bind(&pmo, "text", &defs, wrapper).unwrap_err();
    assert!(err.to_string().contains("buttonInvoke"));
    assert!(context.is_empty());
    field.enter(Value::new(String::from("leaked"))).unwrap();
    assert_eq!(cell.borrow().text, "kept");
}

#[test]
fn user_input_is_pushed_and_announced() {
    let (cell, pmo) = text_model("a");
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("input");
    let rounds = Rc::new(Cell::new(0));
    let seen = Rc::clone(&rounds);
    context.set_after_update_handler(move |_| seen.set(seen.get() + 1));

    let annotation = FieldAnnotation::field().tooltip(ToolTipType::Dynamic);
    context.bind_field(&pmo, "text", &annotation, wrapper.clone()).unwrap();
    assert_eq!(wrapper.tooltip().as_deref(), Some("1 characters"));

    field.enter(Value::new(String::from("hello"))).unwrap();
    assert_eq!(cell.borrow().text, "hello");
    assert_eq!(rounds.get(), 1);
    assert_eq!(wrapper.tooltip().as_deref(), Some("5 characters"));
}

#[test]
fn behaviors_force_read_only() {
    let (cell, pmo) = text_model("fixed");
    let (field, wrapper) = recording_field();
    let behaviors: Vec<Rc<dyn PropertyBehavior>> = vec![Rc::new(ReadOnlyBehavior)];
    let factory = PropertyDispatcherFactory::with_behavior_provider(Rc::new(behaviors));
    let context = BindingContext::with_dispatcher_factory("read-only", factory);

    context.bind_field(&pmo, "text", &FieldAnnotation::field(), wrapper).unwrap();
    assert!(field.is_read_only());

    let err = field.enter(Value::new(String::from("changed"))).unwrap_err();
    assert!(matches!(err.dispatch_error(), Some(DispatchError::PushDenied { .. })));
    assert_eq!(cell.borrow().text, "fixed");
}

#[derive(Default)]
struct Partner {
    name: String,
}

impl Reflect for Partner {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class
            .method("getName", |p: &Partner| p.name.clone())
            .method1("setName", |p: &mut Partner, n: String| p.name = n);
    }
}

struct PartnerPmo {
    partner: BoundObject,
    editable: bool,
}

impl Reflect for PartnerPmo {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class
            .method("getModelObject", |p: &PartnerPmo| p.partner.clone())
            .method("isNameEnabled", |p: &PartnerPmo| p.editable);
    }
}

#[test]
fn model_attribute_redirects_the_value() {
    let partner = BoundObject::new(Partner { name: "Ada".into() });
    let pmo_cell = Rc::new(RefCell::new(PartnerPmo {
        partner: partner.clone(),
        editable: true,
    }));
    let pmo = BoundObject::from_rc(Rc::clone(&pmo_cell));
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("partner");

    let annotation = FieldAnnotation::field()
        .label(LabelType::Static("Partner name".into()))
        .enabled(EnabledType::Dynamic)
        .required(RequiredType::RequiredIfEnabled)
        .model_attribute("");
    context.bind_field(&pmo, "name", &annotation, wrapper.clone()).unwrap();

    assert_eq!(field.text().as_deref(), Some("Ada"));
    assert_eq!(wrapper.label().as_deref(), Some("Partner name"));
    assert_eq!(wrapper.enabled(), Some(true));
    assert!(field.is_required());

    field.enter(Value::new(String::from("Grace"))).unwrap();
    assert_eq!(partner.with(|p: &Partner| p.name.clone()).as_deref(), Some("Grace"));

    pmo_cell.borrow_mut().editable = false;
    context.update_ui().unwrap();
    assert_eq!(wrapper.enabled(), Some(false));
    assert!(!field.is_required(), "required tracks enabled");
}

#[test]
fn messages_reach_pmo_and_model_attribute() {
    let partner = BoundObject::new(Partner::default());
    let pmo = BoundObject::new(PartnerPmo {
        partner: partner.clone(),
        editable: true,
    });
    let (_field, wrapper) = recording_field();
    let context = BindingContext::new("messages");
    context
        .bind_field(&pmo, "name", &FieldAnnotation::field().model_attribute("name"), wrapper.clone())
        .unwrap();

    let elsewhere = BoundObject::new(Partner::default());
    let messages: MessageList = [
        Message::builder("Name is missing", Severity::Error)
            .invalid_object_property(ObjectProperty::new(&partner, "name"))
            .create(),
        Message::builder("Other partner", Severity::Warning)
            .invalid_object_property(ObjectProperty::new(&elsewhere, "name"))
            .create(),
    ]
    .into_iter()
    .collect();

    let shown = context.display_messages(&messages);
    assert_eq!(shown.len(), 1);
    assert_eq!(wrapper.messages().text(), "Name is missing");
}

struct Order {
    submitted: u32,
}

impl Reflect for Order {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class
            .method_mut("submit", |o: &mut Order| o.submitted += 1)
            .method("getSubmitToolTip", |o: &Order| format!("submitted {} times", o.submitted));
    }
}

#[test]
fn button_invokes_the_action() {
    let order = BoundObject::new(Order { submitted: 0 });
    let button = RecordingButton::new();
    let wrapper = RecordingWrapper::new(button.clone());
    let context = BindingContext::new("order");

    let annotation = FieldAnnotation::button().tooltip(ToolTipType::Dynamic);
    context.bind_field(&order, "submit", &annotation, wrapper.clone()).unwrap();
    assert_eq!(wrapper.label().as_deref(), Some("Submit"));

    button.click().unwrap();
    button.click().unwrap();
    assert_eq!(order.with(|o: &Order| o.submitted), Some(2));
    assert_eq!(wrapper.tooltip().as_deref(), Some("submitted 2 times"));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Open,
    Closed,
}

impl EnumValues for Status {
    fn values() -> Vec<Self> {
        vec![Self::Open, Self::Closed]
    }
}

struct Ticket {
    status: Status,
}

impl Reflect for Ticket {
    fn reflect(class: &mut ClassBuilder<Self>) {
        class
            .method("getStatus", |t: &Ticket| t.status)
            .method1("setStatus", |t: &mut Ticket, s: Status| t.status = s);
    }
}

#[test]
fn enum_choices_precede_the_value() {
    register_enum_values::<Status>();
    let ticket = BoundObject::new(Ticket {
        status: Status::Closed,
    });
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("ticket");
    let annotation = FieldAnnotation::field().available_values(AvailableValuesType::EnumValuesInclNull);
    context.bind_field(&ticket, "status", &annotation, wrapper).unwrap();

    let items = field.items();
    assert_eq!(items.len(), 3);
    assert!(items[0].is_null());
    assert!(items[1].eq_to(&Status::Open));
    assert!(bindery_binding::HasValue::value(field.as_ref()).eq_to(&Status::Closed));

    field.enter(Value::new(Status::Open)).unwrap();
    assert_eq!(ticket.with(|t: &Ticket| t.status), Some(Status::Open));
}

#[test]
fn removing_a_layout_removes_its_fields() {
    let (_cell, pmo) = text_model("a");
    let panel = RecordingPanel::new();
    let context = BindingContext::new("layout");
    let defs = definitions(vec![Rc::new(ValueAspectDefinition::new())]);

    for _ in 0..2 {
        let (field, wrapper) = recording_field();
        panel.add(field);
        context.bind(&pmo, "text", &defs, wrapper).unwrap();
    }
    let (other, other_wrapper) = recording_field();
    context.bind(&pmo, "text", &defs, other_wrapper).unwrap();
    assert_eq!(context.len(), 3);

    let panel: ComponentRef = panel;
    context.remove_bindings_for_component(&panel);
    assert_eq!(context.len(), 1);
    let other: ComponentRef = other;
    assert!(context.binding_for(&other).is_some());

    context.remove_bindings_for_pmo(&pmo);
    assert!(context.is_empty());
}

#[test]
fn rebinding_a_component_replaces_its_binding() {
    let (first_cell, first) = text_model("first");
    let (second_cell, second) = text_model("second");
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("rebind");
    let defs = definitions(vec![Rc::new(ValueAspectDefinition::new())]);

    context.bind(&first, "text", &defs, wrapper.clone()).unwrap();
    context.bind(&second, "text", &defs, wrapper).unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(field.text().as_deref(), Some("second"));
    assert!(context.bindings().iter().all(|b| b.pmo() == &second));

    field.enter(Value::new(String::from("typed"))).unwrap();
    assert_eq!(first_cell.borrow().text, "first", "released binding stays silent");
    assert_eq!(second_cell.borrow().text, "typed");
}

#[test]
fn missing_setter_makes_the_field_read_only() {
    let pmo = BoundObject::new(XPmo);
    let (field, wrapper) = recording_field();
    let context = BindingContext::new("read-only");
    context.bind_field(&pmo, "x", &FieldAnnotation::field(), wrapper).unwrap();
    assert!(field.is_read_only());
    assert_eq!(field.text().as_deref(), Some("x"));

    let err = field.enter(Value::new(String::from("y"))).unwrap_err();
    assert!(matches!(err.dispatch_error(), Some(DispatchError::NotWritable { .. })));
}

#[test]
fn dropped_context_does_not_break_listeners() {
    let (cell, pmo) = text_model("a");
    let (field, wrapper) = recording_field();
    {
        let context = BindingContext::new("short-lived");
        context.bind_field(&pmo, "text", &FieldAnnotation::field(), wrapper).unwrap();
    }
    field.enter(Value::new(String::from("after"))).unwrap();
    assert_eq!(cell.borrow().text, "after");
}
