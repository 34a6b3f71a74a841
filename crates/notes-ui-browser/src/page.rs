//! The live document behind the core `Page` trait.
//!
//! Failures from the DOM (detached nodes, unsupported APIs, exceptions from
//! `web-sys` calls) are logged and swallowed; the page keeps working without
//! the enhancement.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use notes_ui_core::{Page, Query, ToastView};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry, NodeList,
    ScrollBehavior, ScrollIntoViewOptions, Window,
};

use crate::selectors::selector_for;

/// Class of the character counter element.
pub const COUNTER_CLASS: &str = "char-counter text-muted";

/// An IntersectionObserver and the closure it calls.
struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// `Page` implementation over `web_sys::Document`.
pub struct DomPage {
    window: Window,
    document: Document,
    /// Close-button listeners, keyed by their toast element.
    toast_listeners: RefCell<Vec<(Element, EventListener)>>,
    observers: RefCell<Vec<VisibilityObserver>>,
}

impl DomPage {
    /// The current window's document, if there is one.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self::with_document(window, document))
    }

    pub fn with_document(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            toast_listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn build_toast(&self, view: &ToastView) -> Result<(Element, Element), JsValue> {
        let toast = self.document.create_element("div")?;
        toast.set_class_name(&view.class_name);
        if let Some(html) = toast.dyn_ref::<HtmlElement>() {
            html.style().set_css_text(view.style);
        }

        let icon = self.document.create_element("i")?;
        icon.set_class_name(&view.icon_class);
        toast.append_child(&icon)?;

        // Message goes in as text so server-provided strings can't inject markup.
        let message = self.document.create_text_node(&format!(" {} ", view.message));
        toast.append_child(&message)?;

        let close = self.document.create_element("button")?;
        close.set_attribute("type", "button")?;
        close.set_attribute("aria-label", "Close")?;
        close.set_attribute("style", view.close_style)?;
        close.set_text_content(Some(view.close_label));
        toast.append_child(&close)?;

        Ok((toast, close))
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn intersection_observer_supported(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

impl Page for DomPage {
    type Node = Element;

    fn find_all(&self, query: Query<'_>) -> Vec<Element> {
        match self.document.query_selector_all(&selector_for(query)) {
            Ok(list) => elements(list),
            Err(err) => {
                tracing::warn!(?query, ?err, "selector query failed");
                Vec::new()
            }
        }
    }

    fn find_in(&self, root: &Element, query: Query<'_>) -> Option<Element> {
        root.query_selector(&selector_for(query)).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn current_path(&self) -> String {
        self.window
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_string())
    }

    fn value(&self, field: &Element) -> String {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(textarea) = field.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, field: &Element, value: &str) {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = field.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        }
    }

    fn form_is_valid(&self, form: &Element) -> bool {
        form.dyn_ref::<HtmlFormElement>()
            .map(|form| form.check_validity())
            .unwrap_or(true)
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = node.set_attribute("disabled", "");
        } else {
            let _ = node.remove_attribute("disabled");
        }
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn activate(&self, node: &Element) {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            html.click();
        }
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property(property, value) {
            tracing::warn!(property, ?err, "failed to set style");
        }
    }

    fn mount_toast(&self, view: &ToastView, on_close: Box<dyn Fn()>) -> Option<Element> {
        let body = self.document.body()?;
        let (toast, close) = match self.build_toast(view) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::warn!(?err, "failed to build toast");
                return None;
            }
        };
        if let Err(err) = body.append_child(&toast) {
            tracing::warn!(?err, "failed to append toast");
            return None;
        }

        let listener = EventListener::new(&close, "click", move |_| on_close());
        self.toast_listeners
            .borrow_mut()
            .push((toast.clone(), listener));
        Some(toast)
    }

    fn mount_counter(&self, field: &Element) -> Option<Element> {
        let counter = self.document.create_element("small").ok()?;
        counter.set_class_name(COUNTER_CLASS);
        counter.set_attribute("aria-live", "polite").ok()?;
        field.after_with_node_1(&counter).ok()?;
        Some(counter)
    }

    fn remove(&self, node: &Element) {
        node.remove();
        self.toast_listeners
            .borrow_mut()
            .retain(|(toast, _)| toast != node);
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn observe_visibility(&self, nodes: &[Element], on_visible: Rc<dyn Fn(&Element)>) -> bool {
        if !intersection_observer_supported(&self.window) {
            return false;
        }

        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        let target = entry.target();
                        observer.unobserve(&target);
                        on_visible(&target);
                    }
                }
            },
        );

        let observer = match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                tracing::warn!(?err, "IntersectionObserver construction failed");
                return false;
            }
        };
        for node in nodes {
            observer.observe(node);
        }

        self.observers.borrow_mut().push(VisibilityObserver {
            observer,
            _callback: callback,
        });
        true
    }
}
