//! Browser event handling for the page behaviours.
//!
//! One listener per event type on the document translates DOM events into
//! core `PageEvent`s and applies the handlers' verdict back to the event.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use notes_ui_core::{Dispatch, EventBus, KeyChord, PageEvent};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, SubmitEvent};

/// Build a key chord from a keyboard event.
pub fn key_chord_from_event(event: &KeyboardEvent) -> KeyChord {
    KeyChord {
        key: event.key().into(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }
}

/// The element an event happened on. Text node targets resolve to their
/// parent element.
fn element_target(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(target) => target.dyn_ref::<web_sys::Node>()?.parent_element(),
    }
}

fn translate(kind: &str, event: &Event) -> Option<PageEvent<Element>> {
    match kind {
        "click" => Some(PageEvent::Click {
            target: element_target(event)?,
        }),
        "input" => Some(PageEvent::Input {
            target: element_target(event)?,
        }),
        "submit" => {
            let submitter = event
                .dyn_ref::<SubmitEvent>()
                .and_then(|e| e.submitter())
                .map(Element::from);
            Some(PageEvent::Submit {
                form: element_target(event)?,
                submitter,
            })
        }
        "keydown" => Some(PageEvent::KeyDown(key_chord_from_event(
            event.dyn_ref::<KeyboardEvent>()?,
        ))),
        _ => None,
    }
}

/// Document listeners feeding an event bus. Dropping this detaches them.
pub struct PageListeners {
    _listeners: Vec<EventListener>,
}

impl PageListeners {
    /// Listen for click, submit, input and keydown on `document`.
    pub fn attach(document: &Document, bus: Rc<EventBus<Element>>) -> Self {
        let listeners = ["click", "submit", "input", "keydown"]
            .into_iter()
            .map(|kind| {
                let bus = bus.clone();
                // Listeners are passive by default, which would ignore preventDefault.
                EventListener::new_with_options(
                    document,
                    kind,
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(page_event) = translate(kind, event) else {
                            return;
                        };
                        let mut dispatch = Dispatch::new(event.default_prevented());
                        bus.dispatch_into(&page_event, &mut dispatch);
                        if dispatch.default_prevented() && !event.default_prevented() {
                            event.prevent_default();
                        }
                    },
                )
            })
            .collect();

        Self {
            _listeners: listeners,
        }
    }
}
