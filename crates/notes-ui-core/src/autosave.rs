//! Local auto-save of the note being edited.
//!
//! Typing in the title or content field (re)starts a debounce timer; when
//! the input goes quiet the fields are written to the draft slot. On load a
//! draft is restored into empty fields, and a successful submit clears it.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::bus::{EventBus, PageEvent};
use crate::draft::DraftRecord;
use crate::init::Env;
use crate::page::{Page, Query, TimerId};
use crate::toast::{Toast, ToastKind};

pub const AUTOSAVED_MESSAGE: &str = "Auto-saved";
pub const RESTORED_MESSAGE: &str = "Restored from auto-save";

struct AutoSaveInner<P: Page> {
    env: Env<P>,
    title: P::Node,
    content: P::Node,
    form: Option<P::Node>,
    pending: Cell<Option<TimerId>>,
}

/// Debounced draft persistence for the page's note form.
pub struct AutoSave<P: Page> {
    inner: Rc<AutoSaveInner<P>>,
}

impl<P: Page> Clone for AutoSave<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Page> AutoSave<P> {
    /// Restore any saved draft and start watching the note fields.
    ///
    /// Returns `None` on pages without both a title and a content field.
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Option<Self> {
        let page = &env.page;
        let (Some(title), Some(content)) = (
            page.find_first(Query::TitleField),
            page.find_first(Query::ContentField),
        ) else {
            tracing::debug!("no note form on page, auto-save disabled");
            return None;
        };
        let form = page
            .find_all(Query::Forms)
            .into_iter()
            .find(|f| page.contains(f, &title));

        let autosave = Self {
            inner: Rc::new(AutoSaveInner {
                env: env.clone(),
                title,
                content,
                form,
                pending: Cell::new(None),
            }),
        };

        autosave.restore();

        let handler = autosave.clone();
        bus.subscribe(move |event, dispatch| match event {
            PageEvent::Input { target } => {
                let inner = &handler.inner;
                if *target == inner.title || *target == inner.content {
                    handler.schedule();
                }
            }
            PageEvent::Submit { form, .. } => {
                if handler.inner.form.as_ref() == Some(form) && !dispatch.default_prevented() {
                    handler.clear();
                }
            }
            _ => {}
        });

        Some(autosave)
    }

    /// Fill the fields from the saved draft if both are empty.
    ///
    /// Returns true if the fields were filled. The draft itself is kept.
    pub fn restore(&self) -> bool {
        let inner = &self.inner;
        let env = &inner.env;

        let record = match env.drafts.load() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable draft");
                return false;
            }
        };

        if !env.page.value(&inner.title).is_empty() || !env.page.value(&inner.content).is_empty() {
            tracing::debug!("fields already filled, draft not restored");
            return false;
        }

        env.page.set_value(&inner.title, &record.title);
        env.page.set_value(&inner.content, &record.content);
        env.toasts.notify(
            Toast::new(RESTORED_MESSAGE)
                .kind(ToastKind::Info)
                .duration_ms(env.config.restore_toast_ms),
        );
        tracing::debug!(saved_at = %record.timestamp, "draft restored");
        true
    }

    /// Restart the debounce window.
    pub fn schedule(&self) {
        let inner = &self.inner;
        if let Some(previous) = inner.pending.take() {
            inner.env.timers.clear_timeout(previous);
        }
        let weak: Weak<AutoSaveInner<P>> = Rc::downgrade(inner);
        let id = inner.env.timers.set_timeout(
            inner.env.config.autosave_debounce_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending.set(None);
                    save(&inner);
                }
            }),
        );
        inner.pending.set(Some(id));
    }

    /// Drop the draft and any save still waiting to happen.
    pub fn clear(&self) {
        if let Some(id) = self.inner.pending.take() {
            self.inner.env.timers.clear_timeout(id);
        }
        self.inner.env.drafts.clear();
        tracing::debug!("draft cleared on submit");
    }

    pub fn has_pending_save(&self) -> bool {
        self.inner.pending.get().is_some()
    }
}

fn save<P: Page>(inner: &AutoSaveInner<P>) {
    let env = &inner.env;
    let title = env.page.value(&inner.title);
    let content = env.page.value(&inner.content);

    // Nothing worth keeping; don't leave an empty draft to "restore" later.
    if title.is_empty() && content.is_empty() {
        env.drafts.clear();
        return;
    }

    match env.drafts.save(&DraftRecord::capture(title, content)) {
        Ok(()) => env.toasts.notify(
            Toast::success(AUTOSAVED_MESSAGE).duration_ms(env.config.autosave_toast_ms),
        ),
        Err(err) => tracing::warn!(%err, "auto-save failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftStore;
    use crate::testing::{FakePage, ManualTimers, MemoryDraftStore, NodeId, NoteForm};
    use crate::UiConfig;

    struct Harness {
        page: Rc<FakePage>,
        timers: Rc<ManualTimers>,
        drafts: Rc<MemoryDraftStore>,
        bus: EventBus<NodeId>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                page: Rc::new(FakePage::new()),
                timers: Rc::new(ManualTimers::new()),
                drafts: Rc::new(MemoryDraftStore::new()),
                bus: EventBus::new(),
            }
        }

        fn install(&self) -> Option<AutoSave<FakePage>> {
            let env = Env::new(
                self.page.clone(),
                self.timers.clone(),
                self.drafts.clone(),
                UiConfig::default(),
            );
            AutoSave::install(&env, &self.bus)
        }

        fn type_into(&self, field: NodeId, value: &str) {
            self.page.set_value(&field, value);
            self.bus.dispatch(&PageEvent::Input { target: field });
        }
    }

    fn note_page() -> (Harness, NoteForm) {
        let h = Harness::new();
        let form = h.page.add_note_form();
        (h, form)
    }

    #[test]
    fn test_noop_without_note_fields() {
        let h = Harness::new();
        h.page.add_form();
        h.drafts.put_raw(r#"{"title":"a","content":"b","timestamp":"2026-01-01T00:00:00.000Z"}"#);
        assert!(h.install().is_none());
        assert!(h.bus.is_empty());
        assert!(h.page.toasts().is_empty());
    }

    #[test]
    fn test_burst_coalesces_into_one_write() {
        let (h, form) = note_page();
        h.install().unwrap();

        h.type_into(form.title, "G");
        h.timers.advance(500);
        h.type_into(form.title, "Groceries");
        h.timers.advance(1999);
        h.type_into(form.content, "Milk");
        h.timers.advance(1500);
        h.type_into(form.content, "Milk, eggs");
        assert_eq!(h.drafts.writes(), 0);

        h.timers.advance(2000);
        assert_eq!(h.drafts.writes(), 1);
        let record = h.drafts.load().unwrap().unwrap();
        assert_eq!(record.title, "Groceries");
        assert_eq!(record.content, "Milk, eggs");

        let toasts = h.page.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, AUTOSAVED_MESSAGE);
        assert_eq!(toasts[0].class_name, "alert alert-success alert-toast");

        // Auto-saved toast is short-lived.
        h.timers.advance(1300);
        assert!(h.page.toasts().is_empty());
    }

    #[test]
    fn test_unrelated_input_ignored() {
        let (h, _form) = note_page();
        let other = h.page.add(crate::testing::NodeKind::Other, None);
        h.install().unwrap();

        h.bus.dispatch(&PageEvent::Input { target: other });
        h.timers.advance(5000);
        assert_eq!(h.drafts.writes(), 0);
    }

    #[test]
    fn test_restores_into_empty_fields() {
        let (h, form) = note_page();
        h.drafts.put_raw(
            r#"{"title":"Saved","content":"Saved content","timestamp":"2026-01-01T00:00:00.000Z"}"#,
        );
        h.install().unwrap();

        assert_eq!(h.page.value(&form.title), "Saved");
        assert_eq!(h.page.value(&form.content), "Saved content");
        let toasts = h.page.toasts();
        assert_eq!(toasts[0].message, RESTORED_MESSAGE);
        assert_eq!(toasts[0].class_name, "alert alert-info alert-toast");
        // Restoring keeps the record.
        assert!(h.drafts.raw().is_some());
    }

    #[test]
    fn test_restore_never_clobbers() {
        let (h, form) = note_page();
        h.page.set_value(&form.title, "Typed");
        h.page.set_value(&form.content, "Already typed content");
        h.drafts.put_raw(
            r#"{"title":"Saved","content":"Saved content","timestamp":"2026-01-01T00:00:00.000Z"}"#,
        );
        h.install().unwrap();

        assert_eq!(h.page.value(&form.title), "Typed");
        assert_eq!(h.page.value(&form.content), "Already typed content");
        assert!(h.page.toasts().is_empty());
    }

    #[test]
    fn test_restore_needs_both_empty() {
        let (h, form) = note_page();
        h.page.set_value(&form.title, "Only a title");
        h.drafts.put_raw(
            r#"{"title":"Saved","content":"Saved content","timestamp":"2026-01-01T00:00:00.000Z"}"#,
        );
        h.install().unwrap();
        assert_eq!(h.page.value(&form.content), "");
    }

    #[test]
    fn test_malformed_draft_is_no_draft() {
        let (h, form) = note_page();
        h.drafts.put_raw("{\"title\": oops");
        h.install().unwrap();
        assert_eq!(h.page.value(&form.title), "");
        assert!(h.page.toasts().is_empty());
    }

    #[test]
    fn test_submit_clears_draft_and_pending_save() {
        let (h, form) = note_page();
        let autosave = h.install().unwrap();

        h.type_into(form.title, "Groceries");
        h.timers.advance(2000);
        h.type_into(form.content, "Milk, eggs, bread.");
        assert!(autosave.has_pending_save());

        h.bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });
        assert!(h.drafts.raw().is_none());
        assert!(!autosave.has_pending_save());

        h.timers.advance(5000);
        assert!(h.drafts.raw().is_none());
    }

    #[test]
    fn test_emptied_fields_drop_draft() {
        let (h, form) = note_page();
        h.install().unwrap();

        h.type_into(form.title, "Groceries");
        h.timers.advance(2000);
        assert!(h.drafts.raw().is_some());

        h.type_into(form.title, "");
        h.timers.advance(2000);
        assert!(h.drafts.raw().is_none());
    }
}
