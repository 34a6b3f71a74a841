//! Mounting the behaviours on the live page.

use std::rc::Rc;

use gloo_events::EventListener;
use notes_ui_core::{Env, EventBus, NotesUi, Page, ToastNotifier, UiConfig};
use web_sys::{Document, Element};

use crate::events::PageListeners;
use crate::page::DomPage;
use crate::storage::LocalDraftStore;
use crate::timers::BrowserTimers;

/// Id of the optional `<script type="application/json">` holding a
/// `UiConfig`.
pub const CONFIG_ELEMENT_ID: &str = "notes-ui-config";

/// The behaviours installed on the live page, plus the listeners driving
/// them. Dropping this detaches the document listeners.
pub struct MountedUi {
    pub ui: NotesUi<DomPage>,
    pub bus: Rc<EventBus<Element>>,
    _listeners: PageListeners,
}

impl MountedUi {
    pub fn toasts(&self) -> &ToastNotifier<DomPage> {
        self.ui.toasts()
    }
}

/// Read the page's embedded config, falling back to defaults.
pub fn read_page_config(document: &Document) -> UiConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return UiConfig::default();
    };

    match UiConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring invalid page config");
            UiConfig::default()
        }
    }
}

/// The page's toast slot on the current document.
///
/// Usable before the document has finished loading; `mount` later installs
/// the behaviours around the same slot.
pub fn page_toasts(config: UiConfig) -> Option<ToastNotifier<DomPage>> {
    let page = Rc::new(DomPage::new()?);
    Some(ToastNotifier::new(
        page,
        Rc::new(BrowserTimers::new()),
        Rc::new(config),
    ))
}

/// Install every behaviour on the toast slot's document right now.
pub fn mount(toasts: ToastNotifier<DomPage>) -> MountedUi {
    let drafts = LocalDraftStore::new(toasts.config().storage_key.clone());
    let env = Env::with_toasts(toasts, Rc::new(drafts));
    let page = env.page.clone();

    let bus = Rc::new(EventBus::new());
    let ui = NotesUi::install(env, &bus);
    let listeners = PageListeners::attach(page.document(), bus.clone());

    tracing::info!(path = %page.current_path(), "notes ui mounted");
    MountedUi {
        ui,
        bus,
        _listeners: listeners,
    }
}

/// Mount once the document structure is ready.
///
/// If the document is still loading this waits for `DOMContentLoaded`;
/// otherwise it mounts immediately.
pub fn mount_when_ready(
    toasts: ToastNotifier<DomPage>,
    on_mounted: impl FnOnce(MountedUi) + 'static,
) {
    let document = toasts.page().document().clone();

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            on_mounted(mount(toasts));
        })
        .forget();
    } else {
        on_mounted(mount(toasts));
    }
}
