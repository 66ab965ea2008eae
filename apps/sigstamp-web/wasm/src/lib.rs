//! WASM bindings for signature stamping
//!
//! ## Architecture
//!
//! - State management in Rust via `SignatureStamper` (wrapping
//!   `sigstamp_core::SigningSession`)
//! - PDF decoding and page rasterization by pdf.js through
//!   `www/js/pdf-bridge.js`
//! - Compositing and PDF output in Rust
//! - JavaScript only handles DOM events and file I/O
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { SignatureStamper, initPdfJs } from './pkg/sigstamp_wasm.js';
//!
//! await init();
//! await initPdfJs();
//!
//! const stamper = new SignatureStamper();
//! if (await stamper.loadDocument(file.name, file.type, bytes)) {
//!     await stamper.renderCurrentPage(canvas);
//! }
//! const overlay = stamper.loadSignature(sig.name, sig.type, sigBytes);
//! overlayEl.onmousedown = (e) => place(stamper.pointerDown(e.clientX, e.clientY, e.target.className));
//! saveButton.disabled = !stamper.canSave();
//! stamper.save();
//! ```

pub mod download;
pub mod pdf_viewer;
pub mod stamper;

use wasm_bindgen::prelude::*;

pub use stamper::{OverlayView, SignatureStamper};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Core `tracing` events fall through to `log` records without a
    // subscriber; route those to the browser console
    console_log::init_with_level(log::Level::Debug).ok();

    web_sys::console::log_1(&"SigStamp WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
