//! WASM entry point for the notes page.
//!
//! Loading the module mounts every behaviour on the current document. Inline
//! page scripts can raise toasts through `showToast`.

use std::cell::RefCell;

use notes_ui_browser::{
    DomPage, MountedUi, Toast, ToastKind, ToastNotifier, mount_when_ready, page_toasts,
    read_page_config,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static TOASTS: RefCell<Option<ToastNotifier<DomPage>>> = const { RefCell::new(None) };
    static MOUNTED: RefCell<Option<MountedUi>> = const { RefCell::new(None) };
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    let _ = set_global_default(reg);
}

/// Initialize logging and mount the page behaviours.
///
/// The toast slot is available as soon as this returns; the rest of the
/// behaviours wait for the document to finish loading. Calling it again
/// does nothing.
#[wasm_bindgen(start)]
pub fn init() {
    if TOASTS.with(|slot| slot.borrow().is_some()) {
        return;
    }
    console_error_panic_hook::set_once();
    init_tracing();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::warn!("no document, skipping notes ui");
        return;
    };
    let Some(toasts) = page_toasts(read_page_config(&document)) else {
        tracing::warn!("no window, skipping notes ui");
        return;
    };
    TOASTS.with(|slot| *slot.borrow_mut() = Some(toasts.clone()));

    mount_when_ready(toasts, |mounted| {
        MOUNTED.with(|slot| *slot.borrow_mut() = Some(mounted));
    });
}

/// Build the toast for a `showToast` call.
fn toast_from_args(message: &str, kind: Option<&str>, duration_ms: Option<u32>) -> Toast {
    let toast = Toast::new(message).kind(kind.map(ToastKind::from_name).unwrap_or_default());
    match duration_ms {
        Some(duration_ms) => toast.duration_ms(duration_ms),
        None => toast,
    }
}

/// Show a toast, replacing any toast already on screen.
///
/// `kind` is one of `success`, `error`, `warning` or `info`; anything else
/// shows as `info`. `duration_ms` defaults to the configured toast duration.
#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(
    message: &str,
    kind: Option<String>,
    duration_ms: Option<u32>,
) -> Result<(), JsError> {
    let toast = toast_from_args(message, kind.as_deref(), duration_ms);
    TOASTS.with(|slot| {
        let slot = slot.borrow();
        let toasts = slot
            .as_ref()
            .ok_or_else(|| JsError::new("notes ui has no document to show toasts on"))?;
        toasts.notify(toast);
        Ok(())
    })
}
