//! Transient notifications.
//!
//! At most one toast is visible at a time: showing a new one removes the
//! previous one immediately (last call wins, nothing is queued).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smol_str::SmolStr;

use crate::config::UiConfig;
use crate::page::{Page, Timers};

/// Inline style of the toast container.
pub const TOAST_STYLE: &str = "position: fixed; top: 20px; right: 20px; z-index: 1000; \
     min-width: 300px; padding: 15px; border-radius: 10px; font-weight: bold; \
     animation: slideInRight 0.3s ease-out;";

/// Inline style of the close control.
pub const CLOSE_STYLE: &str = "float: right; background: none; border: none; color: inherit; \
     cursor: pointer; font-size: 1.2rem;";

/// Animation played before a timed-out toast is removed.
pub const EXIT_ANIMATION: &str = "slideOutRight 0.3s ease-out";

/// Class marking toast elements.
pub const TOAST_CLASS: &str = "alert-toast";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    /// Parse a kind name, falling back to `Info` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => ToastKind::Success,
            "error" => ToastKind::Error,
            "warning" => ToastKind::Warning,
            _ => ToastKind::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        }
    }

    /// Font Awesome icon name for this kind.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "check-circle",
            ToastKind::Error => "exclamation-triangle",
            ToastKind::Warning => "exclamation-circle",
            ToastKind::Info => "info-circle",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: SmolStr,
    pub kind: ToastKind,
    /// Lifetime in milliseconds. `None` uses the configured default.
    pub duration_ms: Option<u32>,
}

impl Toast {
    pub fn new(message: impl Into<SmolStr>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            duration_ms: None,
        }
    }

    pub fn success(message: impl Into<SmolStr>) -> Self {
        Self::new(message).kind(ToastKind::Success)
    }

    pub fn error(message: impl Into<SmolStr>) -> Self {
        Self::new(message).kind(ToastKind::Error)
    }

    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Everything the platform needs to build a toast element.
///
/// The message is plain text; platforms must insert it as text, not markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub class_name: String,
    pub style: &'static str,
    pub icon_class: String,
    pub message: SmolStr,
    pub close_style: &'static str,
    pub close_label: &'static str,
}

impl ToastView {
    pub fn new(toast: &Toast) -> Self {
        Self {
            class_name: format!("alert alert-{} {}", toast.kind, TOAST_CLASS),
            style: TOAST_STYLE,
            icon_class: format!("fas fa-{}", toast.kind.icon()),
            message: toast.message.clone(),
            close_style: CLOSE_STYLE,
            close_label: "\u{00d7}",
        }
    }
}

struct NotifierInner<P: Page> {
    page: Rc<P>,
    timers: Rc<dyn Timers>,
    config: Rc<UiConfig>,
    current: RefCell<Option<P::Node>>,
}

/// Shows toasts on a page, one at a time.
///
/// Cheap to clone; clones share the visible-toast slot.
pub struct ToastNotifier<P: Page> {
    inner: Rc<NotifierInner<P>>,
}

impl<P: Page> Clone for ToastNotifier<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Page> ToastNotifier<P> {
    pub fn new(page: Rc<P>, timers: Rc<dyn Timers>, config: Rc<UiConfig>) -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                page,
                timers,
                config,
                current: RefCell::new(None),
            }),
        }
    }

    /// Show a toast, replacing any visible one.
    pub fn notify(&self, toast: Toast) {
        let inner = &self.inner;
        if let Some(previous) = inner.current.borrow_mut().take() {
            inner.page.remove(&previous);
        }

        let view = ToastView::new(&toast);

        // The close handler needs the node, which only exists after mounting.
        let mounted: Rc<RefCell<Option<P::Node>>> = Rc::new(RefCell::new(None));
        let on_close = {
            let weak = Rc::downgrade(inner);
            let mounted = mounted.clone();
            Box::new(move || {
                let node = mounted.borrow().clone();
                if let (Some(inner), Some(node)) = (weak.upgrade(), node) {
                    dismiss(&inner, &node);
                }
            })
        };

        let Some(node) = inner.page.mount_toast(&view, on_close) else {
            tracing::warn!(kind = %toast.kind, "could not mount toast");
            return;
        };
        *mounted.borrow_mut() = Some(node.clone());
        *inner.current.borrow_mut() = Some(node.clone());
        tracing::debug!(kind = %toast.kind, message = %toast.message, "toast shown");

        let duration = toast.duration_ms.unwrap_or(inner.config.toast_duration_ms);
        let weak = Rc::downgrade(inner);
        inner.timers.set_timeout(
            duration,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    begin_exit(&inner, node);
                }
            }),
        );
    }

    pub fn page(&self) -> &Rc<P> {
        &self.inner.page
    }

    pub fn timers(&self) -> &Rc<dyn Timers> {
        &self.inner.timers
    }

    pub fn config(&self) -> &Rc<UiConfig> {
        &self.inner.config
    }

    /// The toast currently on screen, if any.
    pub fn current(&self) -> Option<P::Node> {
        self.inner.current.borrow().clone()
    }
}

fn begin_exit<P: Page>(inner: &Rc<NotifierInner<P>>, node: P::Node) {
    // Replaced or closed by hand already.
    if !inner.page.is_attached(&node) {
        return;
    }
    inner.page.set_style(&node, "animation", EXIT_ANIMATION);

    let weak: Weak<NotifierInner<P>> = Rc::downgrade(inner);
    inner.timers.set_timeout(
        inner.config.toast_exit_ms,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                dismiss(&inner, &node);
            }
        }),
    );
}

fn dismiss<P: Page>(inner: &NotifierInner<P>, node: &P::Node) {
    inner.page.remove(node);
    let mut current = inner.current.borrow_mut();
    if current.as_ref() == Some(node) {
        *current = None;
    }
}
