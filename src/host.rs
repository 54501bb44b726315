//! Host capabilities
//!
//! The host is the UI framework component the connector reports to. It receives
//! error reports, popstate relays and link activations.

use std::cell::RefCell;
use std::rc::Rc;

use crate::link::{Container, ElementContainer, LinkHost};
use crate::types::{ErrorReport, HostEvent, LinkState, NavigationEvent};

/// Callbacks the history connector invokes on its host
pub trait NavigationHost {
    /// A capability gap or a failed platform call
    fn error(&self, report: ErrorReport);

    /// The platform fired `popstate`
    fn popstate(&self, event: NavigationEvent);
}

// =============================================================================
// Recording Host
// =============================================================================

/// A host that records every event it receives.
///
/// Also serves as the host of a navigation link, exposing a settable link model
/// and an in-memory container.
pub struct RecordingHost {
    events: RefCell<Vec<HostEvent>>,
    link_state: RefCell<LinkState>,
    element: Rc<ElementContainer>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            link_state: RefCell::new(LinkState::default()),
            element: Rc::new(ElementContainer::new()),
        }
    }

    pub fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Events received so far
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return the events received so far
    pub fn drain(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn errors(&self) -> Vec<ErrorReport> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Error(report) => Some(report.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<NavigationEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Popstate(navigation) => Some(navigation.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_link_state(&self, state: LinkState) {
        *self.link_state.borrow_mut() = state;
    }

    pub fn container(&self) -> Rc<ElementContainer> {
        Rc::clone(&self.element)
    }
}

impl NavigationHost for RecordingHost {
    fn error(&self, report: ErrorReport) {
        self.record(HostEvent::Error(report));
    }

    fn popstate(&self, event: NavigationEvent) {
        self.record(HostEvent::Popstate(event));
    }
}

impl LinkHost for RecordingHost {
    fn on_click(&self) {
        self.record(HostEvent::Click);
    }

    fn state(&self) -> LinkState {
        self.link_state.borrow().clone()
    }

    fn element(&self) -> Rc<dyn Container> {
        self.element.clone()
    }
}
