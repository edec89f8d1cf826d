//! Vista Web - browser host for the interaction engine
//!
//! Exposes the reveal tracker, tilt interactor and focus slot to JavaScript.
//! The page passes in the elements it owns; this crate wires them to
//! `IntersectionObserver` and pointer events and writes the results back as
//! a class name or an inline `transform`.

use wasm_bindgen::prelude::*;

pub mod focus;
pub mod reveal;
pub mod tilt;

pub use focus::FocusSlot;
pub use reveal::{DomObserver, RevealHandle};
pub use tilt::TiltHandle;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(start)]
pub fn start() {
    // Surface panics in the browser console
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        // A logger was already installed by the embedding page
        return;
    }

    log::info!("vista web engine initialised");
}
