//! Cancellable `setTimeout` callbacks via `gloo-timers`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use notes_ui_core::{TimerId, Timers};

#[derive(Default)]
struct TimersInner {
    next_id: Cell<u32>,
    pending: RefCell<HashMap<TimerId, Timeout>>,
}

/// Browser timers. Clones share the same pending set.
#[derive(Clone, Default)]
pub struct BrowserTimers {
    inner: Rc<TimersInner>,
}

impl BrowserTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks that haven't fired or been cancelled.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.borrow().len()
    }
}

impl Timers for BrowserTimers {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0.wrapping_add(1));

        let weak = Rc::downgrade(&self.inner);
        let timeout = Timeout::new(delay_ms, move || {
            // Keep the handle alive until the callback is done.
            let _fired = match weak.upgrade() {
                Some(inner) => {
                    let fired = inner.pending.borrow_mut().remove(&id);
                    fired
                }
                None => None,
            };
            callback();
        });
        self.inner.pending.borrow_mut().insert(id, timeout);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        // Dropping a gloo Timeout cancels it.
        if self.inner.pending.borrow_mut().remove(&id).is_some() {
            tracing::trace!(?id, "timeout cancelled");
        }
    }
}
