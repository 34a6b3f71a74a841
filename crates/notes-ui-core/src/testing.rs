//! In-memory stand-ins for the page, timers and draft slot.
//!
//! Available to this crate's tests and, with the `testing` feature, to
//! downstream crates.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::draft::{DraftRecord, DraftStore};
use crate::error::DraftError;
use crate::page::{Page, Query, TimerId, Timers};
use crate::toast::ToastView;

/// Handle to a node of a [`FakePage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Form,
    TitleField,
    ContentField,
    SubmitButton,
    Link,
    Card,
    Toast,
    Counter,
    Other,
}

struct FakeNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    attached: bool,
    id: Option<String>,
    href: Option<String>,
    value: String,
    valid: bool,
    disabled: bool,
    inner_html: String,
    text: String,
    styles: HashMap<String, String>,
    toast: Option<ToastView>,
    on_close: Option<Rc<dyn Fn()>>,
}

impl FakeNode {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            attached: true,
            id: None,
            href: None,
            value: String::new(),
            valid: true,
            disabled: false,
            inner_html: String::new(),
            text: String::new(),
            styles: HashMap::new(),
            toast: None,
            on_close: None,
        }
    }
}

type VisibilityCallback = Rc<dyn Fn(&NodeId)>;

/// A tiny document tree that records what the behaviours did to it.
pub struct FakePage {
    nodes: RefCell<Vec<FakeNode>>,
    path: RefCell<String>,
    observer_supported: Cell<bool>,
    observed: RefCell<Vec<(NodeId, VisibilityCallback)>>,
    activations: RefCell<Vec<NodeId>>,
    scrolls: RefCell<Vec<NodeId>>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            path: RefCell::new("/".to_string()),
            observer_supported: Cell::new(true),
            observed: RefCell::new(Vec::new()),
            activations: RefCell::new(Vec::new()),
            scrolls: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, node: FakeNode) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    pub fn add(&self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        self.push(FakeNode::new(kind, parent))
    }

    pub fn add_form(&self) -> NodeId {
        self.add(NodeKind::Form, None)
    }

    /// A form with title and content fields and a submit button.
    pub fn add_note_form(&self) -> NoteForm {
        let form = self.add_form();
        NoteForm {
            form,
            title: self.add(NodeKind::TitleField, Some(form)),
            content: self.add(NodeKind::ContentField, Some(form)),
            submit: self.add_submit_button(form, "Save Note"),
        }
    }

    pub fn add_submit_button(&self, form: NodeId, label: &str) -> NodeId {
        let mut node = FakeNode::new(NodeKind::SubmitButton, Some(form));
        node.inner_html = label.to_string();
        self.push(node)
    }

    pub fn add_link(&self, href: &str) -> NodeId {
        let mut node = FakeNode::new(NodeKind::Link, None);
        node.href = Some(href.to_string());
        self.push(node)
    }

    pub fn add_with_id(&self, id: &str) -> NodeId {
        let mut node = FakeNode::new(NodeKind::Other, None);
        node.id = Some(id.to_string());
        self.push(node)
    }

    pub fn add_card(&self) -> NodeId {
        self.add(NodeKind::Card, None)
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }

    pub fn set_observer_supported(&self, supported: bool) {
        self.observer_supported.set(supported);
    }

    pub fn set_form_valid(&self, form: NodeId, valid: bool) {
        self.nodes.borrow_mut()[form.0].valid = valid;
    }

    /// Simulate a node scrolling into the viewport.
    pub fn reveal(&self, node: NodeId) {
        let callbacks: Vec<VisibilityCallback> = {
            let mut observed = self.observed.borrow_mut();
            let (hit, rest): (Vec<_>, Vec<_>) = observed.drain(..).partition(|(n, _)| *n == node);
            *observed = rest;
            hit.into_iter().map(|(_, cb)| cb).collect()
        };
        for callback in callbacks {
            callback(&node);
        }
    }

    /// Simulate clicking a toast's close control.
    pub fn click_toast_close(&self, toast: &NodeId) {
        let on_close = self.nodes.borrow()[toast.0].on_close.clone();
        if let Some(on_close) = on_close {
            on_close();
        }
    }

    /// Attached toasts in insertion order.
    pub fn toasts(&self) -> Vec<ToastView> {
        self.nodes
            .borrow()
            .iter()
            .filter(|n| n.attached)
            .filter_map(|n| n.toast.clone())
            .collect()
    }

    pub fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn is_disabled(&self, node: &NodeId) -> bool {
        self.nodes.borrow()[node.0].disabled
    }

    pub fn text(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attached && n.kind == kind)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    pub fn activations(&self) -> Vec<NodeId> {
        self.activations.borrow().clone()
    }

    pub fn scrolls(&self) -> Vec<NodeId> {
        self.scrolls.borrow().clone()
    }

    pub fn observed_count(&self) -> usize {
        self.observed.borrow().len()
    }

    fn matches(node: &FakeNode, query: Query<'_>) -> bool {
        if !node.attached {
            return false;
        }
        let href = node.href.as_deref();
        match query {
            Query::FragmentLinks => {
                node.kind == NodeKind::Link && href.is_some_and(|h| h.starts_with('#'))
            }
            Query::Forms => node.kind == NodeKind::Form,
            Query::SubmitButtons => node.kind == NodeKind::SubmitButton,
            Query::NoteCards => node.kind == NodeKind::Card,
            Query::TitleField => node.kind == NodeKind::TitleField,
            Query::ContentField => node.kind == NodeKind::ContentField,
            Query::LinkHrefContains(text) => {
                node.kind == NodeKind::Link && href.is_some_and(|h| h.contains(text))
            }
            Query::LinkHrefEquals(text) => node.kind == NodeKind::Link && href == Some(text),
        }
    }
}

/// Node handles of a form built by [`FakePage::add_note_form`].
#[derive(Debug, Clone, Copy)]
pub struct NoteForm {
    pub form: NodeId,
    pub title: NodeId,
    pub content: NodeId,
    pub submit: NodeId,
}

impl Page for FakePage {
    type Node = NodeId;

    fn find_all(&self, query: Query<'_>) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| Self::matches(n, query))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn find_in(&self, root: &NodeId, query: Query<'_>) -> Option<NodeId> {
        self.find_all(query)
            .into_iter()
            .find(|n| n != root && self.contains(root, n))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| n.attached && n.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let node = &nodes[node.0];
        match name {
            "href" => node.href.clone(),
            "id" => node.id.clone(),
            _ => None,
        }
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if current == *ancestor {
                return true;
            }
            cursor = nodes[current.0].parent;
        }
        false
    }

    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn value(&self, field: &NodeId) -> String {
        self.nodes.borrow()[field.0].value.clone()
    }

    fn set_value(&self, field: &NodeId, value: &str) {
        self.nodes.borrow_mut()[field.0].value = value.to_string();
    }

    fn form_is_valid(&self, form: &NodeId) -> bool {
        self.nodes.borrow()[form.0].valid
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.nodes.borrow_mut()[node.0].disabled = disabled;
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].inner_html.clone()
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.nodes.borrow_mut()[node.0].inner_html = html.to_string();
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn activate(&self, node: &NodeId) {
        self.activations.borrow_mut().push(*node);
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolls.borrow_mut().push(*node);
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn mount_toast(&self, view: &ToastView, on_close: Box<dyn Fn()>) -> Option<NodeId> {
        let mut node = FakeNode::new(NodeKind::Toast, None);
        node.toast = Some(view.clone());
        node.on_close = Some(Rc::from(on_close));
        Some(self.push(node))
    }

    fn mount_counter(&self, field: &NodeId) -> Option<NodeId> {
        let parent = self.nodes.borrow()[field.0].parent;
        Some(self.add(NodeKind::Counter, parent))
    }

    fn remove(&self, node: &NodeId) {
        self.nodes.borrow_mut()[node.0].attached = false;
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.nodes.borrow()[node.0].attached
    }

    fn observe_visibility(&self, nodes: &[NodeId], on_visible: Rc<dyn Fn(&NodeId)>) -> bool {
        if !self.observer_supported.get() {
            return false;
        }
        let mut observed = self.observed.borrow_mut();
        for node in nodes {
            observed.push((*node, on_visible.clone()));
        }
        true
    }
}

struct PendingTimer {
    due: u64,
    id: TimerId,
    callback: Box<dyn FnOnce()>,
}

/// Timers driven by hand with [`ManualTimers::advance`].
#[derive(Default)]
pub struct ManualTimers {
    now: Cell<u64>,
    next_id: Cell<u32>,
    pending: RefCell<Vec<PendingTimer>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, firing due callbacks in time order.
    ///
    /// Callbacks scheduled while advancing fire too if they fall due within
    /// the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let index = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                index.map(|i| pending.remove(i))
            };
            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.callback)();
        }
        self.now.set(target);
    }
}

impl Timers for ManualTimers {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push(PendingTimer {
            due: self.now.get() + u64::from(delay_ms),
            id,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.pending.borrow_mut().retain(|t| t.id != id);
    }
}

/// Draft slot backed by a string, like browser local storage.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    raw: RefCell<Option<String>>,
    writes: Cell<usize>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store arbitrary text in the slot, bypassing serialization.
    pub fn put_raw(&self, raw: &str) {
        *self.raw.borrow_mut() = Some(raw.to_string());
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<DraftRecord>, DraftError> {
        match self.raw.borrow().as_deref() {
            Some(raw) => Ok(Some(DraftRecord::from_json(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftError> {
        *self.raw.borrow_mut() = Some(record.to_json()?);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn clear(&self) {
        *self.raw.borrow_mut() = None;
    }
}
