//! Browser DOM layer for the notes page behaviours.
//!
//! This crate implements the `notes-ui-core` platform traits on top of
//! `web-sys` and `gloo`. It assumes a `wasm32-unknown-unknown` target
//! environment.
//!
//! # Architecture
//!
//! - `page`: `DomPage`, the live document behind the core `Page` trait
//! - `selectors`: CSS selectors for each core `Query`
//! - `timers`: `BrowserTimers`, cancellable `setTimeout` callbacks
//! - `storage`: `LocalDraftStore`, the draft slot in `localStorage`
//! - `events`: document-level listeners feeding the core `EventBus`
//! - `boot`: DOM-ready mounting and config discovery
//!
//! # Re-exports
//!
//! This crate re-exports `notes-ui-core` for convenience, so consumers
//! only need to depend on `notes-ui-browser`.

// Re-export core crate
pub use notes_ui_core;
pub use notes_ui_core::*;

pub mod boot;
pub mod events;
pub mod page;
pub mod selectors;
pub mod storage;
pub mod timers;

pub use boot::{
    CONFIG_ELEMENT_ID, MountedUi, mount, mount_when_ready, page_toasts, read_page_config,
};
pub use events::{PageListeners, key_chord_from_event};
pub use page::DomPage;
pub use selectors::selector_for;
pub use storage::LocalDraftStore;
pub use timers::BrowserTimers;
