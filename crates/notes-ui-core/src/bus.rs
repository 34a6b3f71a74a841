//! Delegated page events.
//!
//! The browser layer listens once at the document level and forwards each
//! event here. Behaviours subscribe with a handler that checks whether the
//! event concerns the elements they captured at setup, so tests can fire
//! targeted events at a fake page.

use std::cell::RefCell;
use std::rc::Rc;

use crate::shortcuts::KeyChord;

/// An event delivered to the behaviours.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    /// A click somewhere on the page. `target` is the innermost element.
    Click { target: N },
    /// A form is being submitted natively.
    Submit { form: N, submitter: Option<N> },
    /// A form field's value changed.
    Input { target: N },
    /// A key was pressed anywhere on the page.
    KeyDown(KeyChord),
}

/// Per-dispatch state shared between handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    default_prevented: bool,
}

impl Dispatch {
    /// Start from an event that may already have been cancelled elsewhere.
    pub fn new(default_prevented: bool) -> Self {
        Self { default_prevented }
    }

    /// Ask the platform to suppress the event's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

type Handler<N> = Rc<dyn Fn(&PageEvent<N>, &mut Dispatch)>;

/// Ordered list of event handlers.
///
/// Handlers run in subscription order, and later handlers see whether an
/// earlier one prevented the default action.
pub struct EventBus<N> {
    handlers: RefCell<Vec<Handler<N>>>,
}

impl<N> Default for EventBus<N> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }
}

impl<N> EventBus<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every subsequent event.
    pub fn subscribe(&self, handler: impl Fn(&PageEvent<N>, &mut Dispatch) + 'static) {
        self.handlers.borrow_mut().push(Rc::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Deliver an event to all handlers.
    pub fn dispatch(&self, event: &PageEvent<N>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        self.dispatch_into(event, &mut dispatch);
        dispatch
    }

    /// Deliver an event, continuing from existing dispatch state.
    pub fn dispatch_into(&self, event: &PageEvent<N>, dispatch: &mut Dispatch) {
        // Snapshot so a handler that triggers a nested event (e.g. clicking a
        // link) doesn't hold the borrow.
        let handlers: Vec<Handler<N>> = self.handlers.borrow().clone();
        for handler in handlers {
            handler(event, dispatch);
        }
    }
}
