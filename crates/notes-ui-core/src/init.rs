//! Wiring: the shared environment and one-shot installation of every
//! behaviour.

use std::rc::Rc;

use crate::autosave::AutoSave;
use crate::bus::EventBus;
use crate::cards::CardAnimations;
use crate::config::UiConfig;
use crate::counter::CharacterCounter;
use crate::draft::DraftStore;
use crate::loading::LoadingButton;
use crate::page::{Page, Timers};
use crate::scroll::SmoothScroll;
use crate::shortcuts::ShortcutRouter;
use crate::toast::ToastNotifier;
use crate::validation::FormValidator;

/// Everything a behaviour can reach: the page, timers, the draft slot, the
/// toast slot and the config.
pub struct Env<P: Page> {
    pub page: Rc<P>,
    pub timers: Rc<dyn Timers>,
    pub drafts: Rc<dyn DraftStore>,
    pub toasts: ToastNotifier<P>,
    pub config: Rc<UiConfig>,
}

impl<P: Page> Clone for Env<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            timers: self.timers.clone(),
            drafts: self.drafts.clone(),
            toasts: self.toasts.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P: Page> Env<P> {
    pub fn new(
        page: Rc<P>,
        timers: Rc<dyn Timers>,
        drafts: Rc<dyn DraftStore>,
        config: UiConfig,
    ) -> Self {
        let toasts = ToastNotifier::new(page, timers, Rc::new(config));
        Self::with_toasts(toasts, drafts)
    }

    /// Build around a toast slot that already exists, sharing its page,
    /// timers and config.
    pub fn with_toasts(toasts: ToastNotifier<P>, drafts: Rc<dyn DraftStore>) -> Self {
        Self {
            page: toasts.page().clone(),
            timers: toasts.timers().clone(),
            config: toasts.config().clone(),
            drafts,
            toasts,
        }
    }
}

/// The installed behaviours of one page.
pub struct NotesUi<P: Page> {
    pub env: Env<P>,
    pub scroll: SmoothScroll<P>,
    pub validators: Vec<FormValidator<P>>,
    pub loading: Vec<LoadingButton<P>>,
    pub shortcuts: ShortcutRouter<P>,
    pub autosave: Option<AutoSave<P>>,
    pub cards: CardAnimations<P>,
    pub counter: Option<CharacterCounter<P>>,
}

impl<P: Page> NotesUi<P> {
    /// Install every behaviour once the page structure is ready.
    ///
    /// Order matters for submit handling: validation runs before the loading
    /// buttons and the draft clearing, which both skip blocked submissions.
    /// The counter goes last so it sees a restored draft.
    pub fn install(env: Env<P>, bus: &EventBus<P::Node>) -> Self {
        let scroll = SmoothScroll::install(&env, bus);
        let validators = FormValidator::install(&env, bus);
        let loading = LoadingButton::install(&env, bus);
        let shortcuts = ShortcutRouter::install(&env, bus);
        let autosave = AutoSave::install(&env, bus);
        let cards = CardAnimations::install(&env);
        let counter = CharacterCounter::install(&env, bus);

        tracing::debug!(
            handlers = bus.len(),
            autosave = autosave.is_some(),
            "page behaviours installed"
        );

        Self {
            env,
            scroll,
            validators,
            loading,
            shortcuts,
            autosave,
            cards,
            counter,
        }
    }

    /// The page's toast slot.
    pub fn toasts(&self) -> &ToastNotifier<P> {
        &self.env.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PageEvent;
    use crate::draft::DraftRecord;
    use crate::page::Query;
    use crate::testing::{FakePage, ManualTimers, MemoryDraftStore, NodeId};

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

        fn install(&self) -> NotesUi<FakePage> {
            let env = Env::new(
                self.page.clone(),
                self.timers.clone(),
                self.drafts.clone(),
                UiConfig::default(),
            );
            NotesUi::install(env, &self.bus)
        }
    }

    #[test]
    fn test_list_page_installs_quietly() {
        let h = Harness::new();
        h.page.add_link("/add");
        h.page.add_card();
        h.page.add_card();
        let ui = h.install();

        assert!(ui.autosave.is_none());
        assert!(ui.counter.is_none());
        assert!(ui.validators.is_empty());
        assert_eq!(ui.cards.cards().len(), 2);
        assert!(h.page.toasts().is_empty());
    }

    #[test]
    fn test_early_toast_shares_slot_with_behaviours() {
        let h = Harness::new();
        let toasts = ToastNotifier::new(
            h.page.clone(),
            h.timers.clone(),
            Rc::new(UiConfig::default()),
        );
        toasts.notify(crate::toast::Toast::new("Loading"));

        let form = h.page.add_note_form();
        let env = Env::with_toasts(toasts.clone(), h.drafts.clone());
        let ui = NotesUi::install(env, &h.bus);

        h.page.set_value(&form.title, "Hi");
        h.page.set_value(&form.content, "Long enough content.");
        h.bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });

        let shown = h.page.toasts();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Title must be at least 3 characters long");
        assert_eq!(ui.toasts().current(), toasts.current());
    }

    #[test]
    fn test_blocked_submit_keeps_draft_and_button() {
        let h = Harness::new();
        let form = h.page.add_note_form();
        let ui = h.install();

        h.page.set_value(&form.title, "Hi");
        h.page.set_value(&form.content, "Long enough content.");
        h.bus.dispatch(&PageEvent::Input {
            target: form.title,
        });
        h.timers.advance(2000);
        assert!(h.drafts.raw().is_some());

        let result = h.bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });
        assert!(result.default_prevented());
        assert!(h.drafts.raw().is_some());
        assert!(!h.page.is_disabled(&form.submit));
        assert_eq!(
            h.page.toasts()[0].message,
            "Title must be at least 3 characters long"
        );
        assert!(ui.loading.iter().all(|b| !b.is_busy()));
    }

    #[test]
    fn test_valid_submit_clears_draft_and_marks_busy() {
        let h = Harness::new();
        let form = h.page.add_note_form();
        h.install();

        h.page.set_value(&form.title, "Groceries");
        h.page.set_value(&form.content, "Milk, eggs, bread.");
        h.bus.dispatch(&PageEvent::Input {
            target: form.content,
        });
        h.timers.advance(2000);
        assert!(h.drafts.raw().is_some());

        let result = h.bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });
        assert!(!result.default_prevented());
        assert!(h.drafts.raw().is_none());
        assert!(h.page.is_disabled(&form.submit));
    }

    #[test]
    fn test_restored_draft_feeds_counter() {
        let h = Harness::new();
        let form = h.page.add_note_form();
        h.drafts
            .save(&DraftRecord::capture("Saved title", "Saved body!"))
            .unwrap();
        let ui = h.install();

        let counter = ui.counter.as_ref().unwrap();
        assert_eq!(h.page.text(counter.node()), "11 characters");
        assert_eq!(h.page.value(&form.title), "Saved title");
        assert_eq!(h.page.find_all(Query::NoteCards).len(), 0);
    }
}
