use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentWrapper, WrapperType};
use crate::definition::{AspectDefinition, ModelChanged, UiUpdater};
use crate::dispatcher::PropertyDispatcher;
use crate::error::BindingError;

/// Several definitions acting as one.
///
/// Only members supporting the wrapper's type take part, in declaration
/// order. This is how one property spreads over several targets, e.g. a
/// table cell and its column header.
#[derive(Clone, Default)]
pub struct CompositeAspectDefinition {
    members: Vec<Rc<dyn AspectDefinition>>,
}

impl CompositeAspectDefinition {
    pub const NAME: &'static str = "composite";

    #[must_use]
    pub fn new(members: Vec<Rc<dyn AspectDefinition>>) -> Self {
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[Rc<dyn AspectDefinition>] {
        &self.members
    }

    fn supported(&self, wrapper_type: WrapperType) -> impl Iterator<Item = &Rc<dyn AspectDefinition>> {
        self.members.iter().filter(move |m| m.supports(wrapper_type))
    }
}

fn member_error(member: &str, source: BindingError) -> BindingError {
    BindingError::CompositeMember {
        member: member.to_owned(),
        source: Box::new(source),
    }
}

impl AspectDefinition for CompositeAspectDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
    ) -> UiUpdater {
        let updaters: Vec<(String, UiUpdater)> = self
            .supported(wrapper.wrapper_type())
            .map(|m| (m.name().to_owned(), m.create_ui_updater(dispatcher, wrapper)))
            .collect();
        Box::new(move || {
            updaters
                .iter()
                .try_for_each(|(name, update)| update().map_err(|err| member_error(name, err)))
        })
    }

    fn init_model_update(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &Rc<dyn ComponentWrapper>,
        on_model_changed: ModelChanged,
    ) -> Result<(), BindingError> {
        self.supported(wrapper.wrapper_type()).try_for_each(|m| {
            m.init_model_update(dispatcher, wrapper, Rc::clone(&on_model_changed))
                .map_err(|err| member_error(m.name(), err))
        })
    }

    fn supports(&self, wrapper_type: WrapperType) -> bool {
        self.members.iter().any(|m| m.supports(wrapper_type))
    }
}

impl fmt::Debug for CompositeAspectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|m| m.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::dispatcher::TerminalDispatcher;
    use crate::testing::{RecordingPanel, RecordingWrapper};

    struct Recorder {
        name: &'static str,
        target: WrapperType,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl AspectDefinition for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn create_ui_updater(
            &self,
            _dispatcher: &Rc<dyn PropertyDispatcher>,
            _wrapper: &Rc<dyn ComponentWrapper>,
        ) -> UiUpdater {
            let (name, log) = (self.name, Rc::clone(&self.log));
            Box::new(move || {
                log.borrow_mut().push(name);
                Ok(())
            })
        }

        fn supports(&self, wrapper_type: WrapperType) -> bool {
            wrapper_type == self.target
        }
    }

    struct Failing;

    impl AspectDefinition for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn create_ui_updater(
            &self,
            dispatcher: &Rc<dyn PropertyDispatcher>,
            _wrapper: &Rc<dyn ComponentWrapper>,
        ) -> UiUpdater {
            let dispatcher = Rc::clone(dispatcher);
            Box::new(move || {
                dispatcher
                    .pull(&crate::Aspect::of("anything"))
                    .map(drop)
                    .map_err(BindingError::from)
            })
        }
    }

    fn fixture() -> (Rc<dyn PropertyDispatcher>, Rc<dyn ComponentWrapper>) {
        let dispatcher: Rc<dyn PropertyDispatcher> = Rc::new(TerminalDispatcher::new("x", "app::Row"));
        let wrapper: Rc<dyn ComponentWrapper> =
            RecordingWrapper::with_type(RecordingPanel::new(), WrapperType::ColumnHeader);
        (dispatcher, wrapper)
    }

    #[test]
    fn only_supported_members_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recorder = |name, target| -> Rc<dyn AspectDefinition> {
            Rc::new(Recorder {
                name,
                target,
                log: Rc::clone(&log),
            })
        };
        let composite = CompositeAspectDefinition::new(vec![
            recorder("header-label", WrapperType::ColumnHeader),
            recorder("cell-value", WrapperType::Field),
            recorder("header-tooltip", WrapperType::ColumnHeader),
        ]);
        let (dispatcher, wrapper) = fixture();

        assert!(composite.supports(WrapperType::ColumnHeader));
        assert!(!composite.supports(WrapperType::Layout));
        composite.create_ui_updater(&dispatcher, &wrapper)().unwrap();
        assert_eq!(*log.borrow(), ["header-label", "header-tooltip"]);
    }

    #[test]
    fn member_errors_name_the_member() {
        let composite = CompositeAspectDefinition::new(vec![Rc::new(Failing)]);
        let (dispatcher, wrapper) = fixture();
        let err = composite.create_ui_updater(&dispatcher, &wrapper)().unwrap_err();
        assert!(matches!(err, BindingError::CompositeMember { ref member, .. } if member == "failing"));
        assert!(err.dispatch_error().is_some());
    }
}
