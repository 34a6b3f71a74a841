//! notes-ui-core: page behaviours for the notes app without DOM dependencies.
//!
//! This crate provides:
//! - `Page` trait - the document as seen by the behaviours (injectable, fakeable)
//! - `Timers` trait - scheduled callbacks on the UI thread
//! - `DraftStore` trait - the single local draft slot
//! - `EventBus` - delegated page events with component-scoped subscriptions
//! - The behaviours themselves: smooth scrolling, validation, loading buttons,
//!   keyboard shortcuts, draft auto-save, card animations, character counter
//!   and toasts
//!
//! Everything here runs on one thread. Shared state uses `Rc`/`Cell`/`RefCell`.

pub mod autosave;
pub mod bus;
pub mod cards;
pub mod config;
pub mod counter;
pub mod draft;
pub mod error;
pub mod init;
pub mod loading;
pub mod page;
pub mod scroll;
pub mod shortcuts;
pub mod toast;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use autosave::AutoSave;
pub use bus::{Dispatch, EventBus, PageEvent};
pub use cards::{CardAnimations, stagger_delay, stagger_delay_css};
pub use config::{DRAFT_STORAGE_KEY, SAVING_LABEL_HTML, UiConfig};
pub use counter::{CharacterCounter, character_count_label};
pub use draft::{DraftRecord, DraftStore};
pub use error::{ConfigError, DraftError, ValidationError};
pub use init::{Env, NotesUi};
pub use loading::{LoadingButton, LoadingState};
pub use page::{Page, Query, TimerId, Timers};
pub use scroll::{SmoothScroll, fragment_id};
pub use shortcuts::{KeyChord, Shortcut, ShortcutRouter};
pub use smol_str::SmolStr;
pub use toast::{Toast, ToastKind, ToastNotifier, ToastView};
pub use validation::{FormValidator, validate_note};
