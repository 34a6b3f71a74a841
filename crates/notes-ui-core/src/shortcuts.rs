//! Global keyboard shortcuts.
//!
//! - Ctrl/Cmd + N opens the "new note" page
//! - Escape goes back to the notes list from any other page

use smol_str::SmolStr;

use crate::bus::{EventBus, PageEvent};
use crate::init::Env;
use crate::page::{Page, Query};

/// Path of the notes list.
pub const ROOT_PATH: &str = "/";

/// Text identifying the "new note" link's href.
pub const NEW_NOTE_HREF: &str = "add";

/// A key press with its modifier state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    /// `KeyboardEvent.key`, e.g. `"n"` or `"Escape"`.
    pub key: SmolStr,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NewNote,
    BackToList,
}

impl Shortcut {
    /// Map a key press on the page at `current_path` to a shortcut.
    pub fn from_chord(chord: &KeyChord, current_path: &str) -> Option<Self> {
        if (chord.ctrl || chord.meta) && chord.key == "n" {
            return Some(Shortcut::NewNote);
        }
        if chord.key == "Escape" && current_path != ROOT_PATH {
            return Some(Shortcut::BackToList);
        }
        None
    }

    /// Whether the browser's own handling of the key must be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Shortcut::NewNote)
    }
}

/// Routes shortcuts to the page's existing navigation links.
pub struct ShortcutRouter<P: Page> {
    env: Env<P>,
    new_note_link: Option<P::Node>,
    list_link: Option<P::Node>,
}

impl<P: Page> Clone for ShortcutRouter<P> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            new_note_link: self.new_note_link.clone(),
            list_link: self.list_link.clone(),
        }
    }
}

impl<P: Page> ShortcutRouter<P> {
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Self {
        let router = Self {
            env: env.clone(),
            new_note_link: env.page.find_first(Query::LinkHrefContains(NEW_NOTE_HREF)),
            list_link: env.page.find_first(Query::LinkHrefEquals(ROOT_PATH)),
        };

        let handler = router.clone();
        bus.subscribe(move |event, dispatch| {
            let PageEvent::KeyDown(chord) = event else {
                return;
            };
            let Some(shortcut) = Shortcut::from_chord(chord, &handler.env.page.current_path())
            else {
                return;
            };
            if shortcut.prevents_default() {
                dispatch.prevent_default();
            }
            handler.trigger(shortcut);
        });

        tracing::debug!(
            new_note = router.new_note_link.is_some(),
            list = router.list_link.is_some(),
            "keyboard shortcuts installed"
        );
        router
    }

    /// Follow the link for `shortcut`. Returns false when the page has none.
    pub fn trigger(&self, shortcut: Shortcut) -> bool {
        let link = match shortcut {
            Shortcut::NewNote => self.new_note_link.as_ref(),
            Shortcut::BackToList => self.list_link.as_ref(),
        };
        match link {
            Some(link) => {
                tracing::debug!(?shortcut, "shortcut triggered");
                self.env.page.activate(link);
                true
            }
            None => false,
        }
    }
}
