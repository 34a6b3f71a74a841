//! Busy state for submit buttons.
//!
//! While its form is submitting, a button is disabled and shows a spinner.
//! If the page is still around after the safety window (e.g. the server
//! re-rendered without navigating), the button is restored.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::bus::{EventBus, PageEvent};
use crate::init::Env;
use crate::page::{Page, Query, TimerId};

/// Label bookkeeping for one button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    /// Busy, holding the label to put back.
    Busy { original_label: String },
}

impl LoadingState {
    /// Enter the busy state, snapshotting `current_label` only if idle.
    ///
    /// Returns true on the idle to busy transition.
    pub fn begin(&mut self, current_label: &str) -> bool {
        match self {
            LoadingState::Idle => {
                *self = LoadingState::Busy {
                    original_label: current_label.to_string(),
                };
                true
            }
            LoadingState::Busy { .. } => false,
        }
    }

    /// Leave the busy state, returning the label to restore.
    pub fn finish(&mut self) -> Option<String> {
        match std::mem::take(self) {
            LoadingState::Busy { original_label } => Some(original_label),
            LoadingState::Idle => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, LoadingState::Busy { .. })
    }
}

struct ButtonInner<P: Page> {
    env: Env<P>,
    form: P::Node,
    button: P::Node,
    state: RefCell<LoadingState>,
    reset_timer: Cell<Option<TimerId>>,
}

/// A submit button wired to show progress while its form submits.
pub struct LoadingButton<P: Page> {
    inner: Rc<ButtonInner<P>>,
}

impl<P: Page> Clone for LoadingButton<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Page> LoadingButton<P> {
    /// Wire every submit button that sits inside a form.
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Vec<Self> {
        let page = &env.page;
        let forms = page.find_all(Query::Forms);
        let buttons: Vec<Self> = page
            .find_all(Query::SubmitButtons)
            .into_iter()
            .filter_map(|button| {
                let form = forms.iter().find(|f| page.contains(f, &button))?.clone();
                Some(Self {
                    inner: Rc::new(ButtonInner {
                        env: env.clone(),
                        form,
                        button,
                        state: RefCell::new(LoadingState::Idle),
                        reset_timer: Cell::new(None),
                    }),
                })
            })
            .collect();

        for button in &buttons {
            let button = button.clone();
            bus.subscribe(move |event, dispatch| {
                let PageEvent::Submit { form, submitter } = event else {
                    return;
                };
                let inner = &button.inner;
                if *form != inner.form || dispatch.default_prevented() {
                    return;
                }
                // Implicit submission (Enter in a field) has no submitter;
                // then every button of the form goes busy.
                if submitter.as_ref().is_some_and(|s| *s != inner.button) {
                    return;
                }
                if inner.env.page.form_is_valid(&inner.form) {
                    button.begin();
                }
            });
        }

        tracing::debug!(count = buttons.len(), "loading buttons installed");
        buttons
    }

    /// Disable the button and show the saving label, then schedule the reset.
    ///
    /// Calling this again while busy keeps the first label snapshot and
    /// restarts the safety window.
    pub fn begin(&self) {
        let inner = &self.inner;
        let page = &inner.env.page;

        let current = page.inner_html(&inner.button);
        if inner.state.borrow_mut().begin(&current) {
            page.set_disabled(&inner.button, true);
            page.set_inner_html(&inner.button, &inner.env.config.saving_label_html);
        }

        if let Some(previous) = inner.reset_timer.take() {
            inner.env.timers.clear_timeout(previous);
        }
        let weak: Weak<ButtonInner<P>> = Rc::downgrade(inner);
        let id = inner.env.timers.set_timeout(
            inner.env.config.loading_reset_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.reset_timer.set(None);
                    restore(&inner);
                }
            }),
        );
        inner.reset_timer.set(Some(id));
    }

    /// Re-enable the button and put its original label back.
    pub fn reset(&self) {
        if let Some(id) = self.inner.reset_timer.take() {
            self.inner.env.timers.clear_timeout(id);
        }
        restore(&self.inner);
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().is_busy()
    }

    pub fn button(&self) -> &P::Node {
        &self.inner.button
    }
}

fn restore<P: Page>(inner: &ButtonInner<P>) {
    let Some(label) = inner.state.borrow_mut().finish() else {
        return;
    };
    let page = &inner.env.page;
    page.set_disabled(&inner.button, false);
    page.set_inner_html(&inner.button, &label);
    tracing::debug!("submit button restored after safety window");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAVING_LABEL_HTML;
    use crate::testing::{FakePage, ManualTimers, MemoryDraftStore, NodeId, NoteForm};
    use crate::UiConfig;

    fn setup() -> (
        Rc<FakePage>,
        Rc<ManualTimers>,
        EventBus<NodeId>,
        NoteForm,
        Vec<LoadingButton<FakePage>>,
    ) {
        let page = Rc::new(FakePage::new());
        let timers = Rc::new(ManualTimers::new());
        let form = page.add_note_form();
        let env = Env::new(
            page.clone(),
            timers.clone(),
            Rc::new(MemoryDraftStore::new()),
            UiConfig::default(),
        );
        let bus = EventBus::new();
        let buttons = LoadingButton::install(&env, &bus);
        (page, timers, bus, form, buttons)
    }

    fn submit(bus: &EventBus<NodeId>, form: &NoteForm) {
        bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });
    }

    #[test]
    fn test_state_snapshots_once() {
        let mut state = LoadingState::default();
        assert!(state.begin("Save Note"));
        assert!(!state.begin("<div class=\"loading\"></div> Saving..."));
        assert_eq!(state.finish().as_deref(), Some("Save Note"));
        assert_eq!(state.finish(), None);
    }

    #[test]
    fn test_submit_marks_busy_then_resets() {
        let (page, timers, bus, form, buttons) = setup();
        assert_eq!(buttons.len(), 1);

        submit(&bus, &form);
        assert!(page.is_disabled(&form.submit));
        assert_eq!(page.inner_html(&form.submit), SAVING_LABEL_HTML);

        timers.advance(4999);
        assert!(page.is_disabled(&form.submit));

        timers.advance(1);
        assert!(!page.is_disabled(&form.submit));
        assert_eq!(page.inner_html(&form.submit), "Save Note");
    }

    #[test]
    fn test_repeated_submit_does_not_stack() {
        let (page, timers, bus, form, buttons) = setup();

        submit(&bus, &form);
        timers.advance(3000);
        submit(&bus, &form);
        assert_eq!(timers.pending_count(), 1);

        // The first window would have ended here.
        timers.advance(2000);
        assert!(buttons[0].is_busy());

        timers.advance(3000);
        assert!(!buttons[0].is_busy());
        // Original label, not the spinner captured by the second trigger.
        assert_eq!(page.inner_html(&form.submit), "Save Note");
    }

    #[test]
    fn test_keeps_custom_label() {
        let page = Rc::new(FakePage::new());
        let timers = Rc::new(ManualTimers::new());
        let form = page.add_form();
        let button = page.add_submit_button(form, "<i class=\"fas fa-save\"></i> Update Note");
        let env = Env::new(
            page.clone(),
            timers.clone(),
            Rc::new(MemoryDraftStore::new()),
            UiConfig::default(),
        );
        let bus = EventBus::new();
        LoadingButton::install(&env, &bus);

        bus.dispatch(&PageEvent::Submit {
            form,
            submitter: None,
        });
        timers.advance(5000);
        assert_eq!(page.inner_html(&button), "<i class=\"fas fa-save\"></i> Update Note");
    }

    #[test]
    fn test_invalid_form_untouched() {
        let (page, _timers, bus, form, _buttons) = setup();
        page.set_form_valid(form.form, false);
        submit(&bus, &form);
        assert!(!page.is_disabled(&form.submit));
    }

    #[test]
    fn test_prevented_submit_untouched() {
        let (page, _timers, bus, form, _buttons) = setup();
        let mut dispatch = crate::bus::Dispatch::new(true);
        bus.dispatch_into(
            &PageEvent::Submit {
                form: form.form,
                submitter: Some(form.submit),
            },
            &mut dispatch,
        );
        assert!(!page.is_disabled(&form.submit));
    }

    #[test]
    fn test_other_submitter_untouched() {
        let (page, _timers, bus, form, _buttons) = setup();
        let other = page.add_submit_button(form.form, "Save Draft");
        bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(other),
        });
        assert!(!page.is_disabled(&form.submit));
    }

    #[test]
    fn test_manual_reset_cancels_timer() {
        let (page, timers, bus, form, buttons) = setup();
        submit(&bus, &form);
        buttons[0].reset();
        assert_eq!(timers.pending_count(), 0);
        assert!(!page.is_disabled(&form.submit));
    }
}
