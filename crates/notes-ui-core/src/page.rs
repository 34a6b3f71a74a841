//! Platform abstraction traits for the page behaviours.
//!
//! These traits define the interface between the behaviours and the actual
//! document. The browser implementation lives in `notes-ui-browser`; tests use
//! the fakes in `crate::testing`.
//!
//! Every method degrades quietly: lookups return `None`/empty, mutations on a
//! node that can't take them do nothing. Behaviours probe for what they need
//! at setup time and hold on to the nodes they found.

use std::fmt;
use std::rc::Rc;

use crate::toast::ToastView;

/// The elements a behaviour may look up.
///
/// Kept semantic rather than as raw selectors so fake pages don't need a
/// selector engine. The browser maps each variant to a CSS selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Anchors whose href starts with `#`.
    FragmentLinks,
    /// Every form on the page.
    Forms,
    /// `button[type="submit"]`.
    SubmitButtons,
    /// Server-rendered note cards.
    NoteCards,
    /// `input[name="title"]`.
    TitleField,
    /// `textarea[name="content"]`.
    ContentField,
    /// Anchors whose href contains the given text.
    LinkHrefContains(&'a str),
    /// Anchors whose href is exactly the given text.
    LinkHrefEquals(&'a str),
}

/// The document as the behaviours see it.
pub trait Page: 'static {
    /// Handle to an element. Equality means "same element".
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// All matching elements in document order.
    fn find_all(&self, query: Query<'_>) -> Vec<Self::Node>;

    /// First matching element in document order.
    fn find_first(&self, query: Query<'_>) -> Option<Self::Node> {
        self.find_all(query).into_iter().next()
    }

    /// First matching descendant of `root`.
    fn find_in(&self, root: &Self::Node, query: Query<'_>) -> Option<Self::Node>;

    /// Element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether `node` is `ancestor` or inside it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Path part of the current location, e.g. `/add`.
    fn current_path(&self) -> String;

    /// Current value of a form field.
    fn value(&self, field: &Self::Node) -> String;

    fn set_value(&self, field: &Self::Node, value: &str);

    /// Native constraint validation of a form.
    fn form_is_valid(&self, form: &Self::Node) -> bool;

    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    fn inner_html(&self, node: &Self::Node) -> String;

    fn set_inner_html(&self, node: &Self::Node, html: &str);

    fn set_text(&self, node: &Self::Node, text: &str);

    /// Activate an element as if the user clicked it.
    fn activate(&self, node: &Self::Node);

    /// Smoothly scroll an element into view.
    fn scroll_into_view(&self, node: &Self::Node);

    /// Set an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Build a toast element from `view` and append it to the body.
    ///
    /// `on_close` runs when the user clicks the toast's close control.
    fn mount_toast(&self, view: &ToastView, on_close: Box<dyn Fn()>) -> Option<Self::Node>;

    /// Insert an empty counter element directly after `field`.
    fn mount_counter(&self, field: &Self::Node) -> Option<Self::Node>;

    /// Detach an element from the document.
    fn remove(&self, node: &Self::Node);

    /// Whether an element is still in the document.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Call `on_visible` once for each of `nodes` when it first enters the
    /// viewport.
    ///
    /// Returns false when the platform has no visibility observation, in
    /// which case nothing is observed.
    fn observe_visibility(&self, nodes: &[Self::Node], on_visible: Rc<dyn Fn(&Self::Node)>)
    -> bool;
}

/// Handle for a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// One-shot callbacks on the UI thread.
pub trait Timers: 'static {
    /// Run `callback` once after `delay_ms`.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending callback. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}
