//! Stateful signing session exposed to the page script
//!
//! The page script only wires DOM events: file inputs call
//! `loadDocument`/`loadSignature`, pointer handlers call
//! `pointerDown`/`pointerMove`/`pointerUp`, and the returned placement is
//! written back to the overlay element's style.

use crate::download::download_bytes;
use crate::pdf_viewer::{self, PdfHandle};
use serde::Serialize;
use sigstamp_core::{
    DocumentTicket, LoadOutcome, OverlayPlacement, PointerEvent, PointerTarget, SigningSession,
    SourceDocument, StampConfig, StampError,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

/// Overlay geometry for the page script, in CSS pixels
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub gesture: &'static str,
}

impl OverlayView {
    fn new(placement: OverlayPlacement, gesture: &'static str) -> Self {
        Self {
            left: placement.left,
            top: placement.top,
            width: placement.width,
            height: placement.height(),
            gesture,
        }
    }
}

/// The decoded document backing the session's current document generation
#[derive(Debug)]
struct DocumentCache<H> {
    current: Option<(u64, H)>,
}

impl<H> Default for DocumentCache<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H> DocumentCache<H> {
    /// Make `handle` current; returns the replaced handle for release
    fn install(&mut self, generation: u64, handle: H) -> Option<H> {
        self.current
            .replace((generation, handle))
            .map(|(_, previous)| previous)
    }

    /// The handle for `generation`, if it is still current
    fn get(&self, generation: u64) -> Option<&H> {
        self.current
            .as_ref()
            .filter(|(current, _)| *current == generation)
            .map(|(_, handle)| handle)
    }
}

/// Browser-facing wrapper around `SigningSession`
///
/// The session sits behind `Rc<RefCell<_>>` so decodes and renders can await
/// pdf.js without holding a borrow while pointer events keep arriving.
#[wasm_bindgen]
pub struct SignatureStamper {
    session: Rc<RefCell<SigningSession>>,
    pdf: Rc<RefCell<DocumentCache<PdfHandle>>>,
}

impl Default for SignatureStamper {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SignatureStamper {
    /// Create a session with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_session(SigningSession::default())
    }

    /// Create a session from a JSON configuration object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<SignatureStamper, JsValue> {
        let config = StampConfig::from_json(config_json).map_err(to_js)?;
        let session = SigningSession::new(config).map_err(to_js)?;
        Ok(Self::from_session(session))
    }

    /// Hand over a selected PDF file
    ///
    /// Resolves to true once pdf.js has decoded it and it became the current
    /// document. A file of the wrong type resolves to false without changes;
    /// a file pdf.js cannot decode raises a blocking alert.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&self, name: String, file_type: &str, bytes: Vec<u8>) -> js_sys::Promise {
        let ticket = self
            .session
            .borrow_mut()
            .begin_document_load(&name, file_type);
        let session = Rc::clone(&self.session);
        let pdf = Rc::clone(&self.pdf);

        future_to_promise(async move {
            let Some(ticket) = ticket else {
                return Ok(JsValue::FALSE);
            };

            let decoded = pdf_viewer::load_document(&bytes).await;
            let outcome = apply_decode(
                &session,
                ticket,
                &name,
                decoded
                    .as_ref()
                    .map(PdfHandle::page_count)
                    .map_err(describe),
            );

            match (outcome, decoded) {
                (Ok(true), Ok(handle)) => {
                    let generation = session.borrow().generation();
                    if let Some(previous) = pdf.borrow_mut().install(generation, handle) {
                        previous.destroy();
                    }
                    Ok(JsValue::TRUE)
                }
                (outcome, decoded) => {
                    if let Ok(handle) = decoded {
                        handle.destroy();
                    }
                    if let Err(message) = outcome {
                        alert(&message);
                    }
                    Ok(JsValue::FALSE)
                }
            }
        })
    }

    /// Render the current page and paint it onto `canvas`
    ///
    /// Resolves to true when the render was installed. Render failures are
    /// logged to the console and resolve to false.
    #[wasm_bindgen(js_name = renderCurrentPage)]
    pub fn render_current_page(&self, canvas: HtmlCanvasElement) -> js_sys::Promise {
        let session = Rc::clone(&self.session);
        let pdf = Rc::clone(&self.pdf);
        future_to_promise(async move {
            let (request, handle) = {
                let session = session.borrow();
                let Some(request) = session.begin_render() else {
                    return Ok(JsValue::FALSE);
                };
                let handle = pdf.borrow().get(request.generation).cloned();
                let Some(handle) = handle else {
                    return Ok(JsValue::FALSE);
                };
                (request, handle)
            };

            let raster = match pdf_viewer::render_page(&handle, request.page, request.zoom).await {
                Ok(raster) => raster,
                Err(e) => {
                    let reason = describe(&e);
                    web_sys::console::error_1(&format!("Error rendering page: {}", reason).into());
                    session.borrow().fail_render(request, &reason);
                    return Ok(JsValue::FALSE);
                }
            };

            let installed = session.borrow_mut().complete_render(request, raster);
            if installed {
                let session = session.borrow();
                if let Some(surface) = session.surface() {
                    if let Err(e) = pdf_viewer::paint(&canvas, surface.raster()) {
                        web_sys::console::error_1(&e);
                    }
                }
            }
            Ok(JsValue::from_bool(installed))
        })
    }

    /// Hand over a selected signature image
    ///
    /// Returns the new overlay placement, or null when the file was ignored
    /// or could not be decoded.
    #[wasm_bindgen(js_name = loadSignature)]
    pub fn load_signature(&self, name: &str, file_type: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let result = self
            .session
            .borrow_mut()
            .load_signature(name, file_type, bytes);
        match result {
            Ok(LoadOutcome::Loaded) => self.overlay(),
            Ok(LoadOutcome::Ignored) => Ok(JsValue::NULL),
            Err(e) => {
                web_sys::console::warn_1(&e.to_string().into());
                Ok(JsValue::NULL)
            }
        }
    }

    /// Current overlay placement, or null
    #[wasm_bindgen]
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        match session.overlay() {
            Some(placement) => to_value(&OverlayView::new(placement, session.gesture().name())),
            None => Ok(JsValue::NULL),
        }
    }

    /// Pointer pressed; `target` is "overlay", "resize-handle" or anything else
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64, target: &str) -> Result<JsValue, JsValue> {
        self.pointer(PointerEvent::down(x, y, PointerTarget::from_name(target)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.pointer(PointerEvent::moved(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.pointer(PointerEvent::up(x, y))
    }

    /// Remove the overlay
    #[wasm_bindgen(js_name = clearSignature)]
    pub fn clear_signature(&self) {
        self.session.borrow_mut().clear_signature();
    }

    /// Whether the save control should be enabled
    #[wasm_bindgen(js_name = canSave)]
    pub fn can_save(&self) -> bool {
        self.session.borrow().can_export()
    }

    /// Whether the clear control should be enabled
    #[wasm_bindgen(js_name = canClear)]
    pub fn can_clear(&self) -> bool {
        self.session.borrow().can_clear()
    }

    /// Build the signed document and return its bytes, or null when there is
    /// nothing to export
    #[wasm_bindgen(js_name = exportBytes)]
    pub fn export_bytes(&self) -> Result<Option<js_sys::Uint8Array>, JsValue> {
        let artifact = self.session.borrow().export().map_err(to_js)?;
        Ok(artifact.map(|artifact| {
            let array = js_sys::Uint8Array::new_with_length(artifact.bytes.len() as u32);
            array.copy_from(&artifact.bytes);
            array
        }))
    }

    /// Build the signed document and start the browser download
    ///
    /// Returns false (and does nothing) when there is nothing to export.
    #[wasm_bindgen]
    pub fn save(&self) -> Result<bool, JsValue> {
        let session = self.session.borrow();
        match session.export().map_err(to_js)? {
            Some(artifact) => {
                download_bytes(
                    &artifact.bytes,
                    &artifact.filename,
                    &session.config().document_mime,
                )?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fixed output file name
    #[wasm_bindgen(getter, js_name = outputFilename)]
    pub fn output_filename(&self) -> String {
        self.session.borrow().config().output_filename.clone()
    }

    /// Page count of the loaded document (0 when none)
    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.session
            .borrow()
            .document()
            .map(|doc| doc.page_count())
            .unwrap_or(0)
    }
}

impl SignatureStamper {
    fn from_session(session: SigningSession) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            pdf: Rc::new(RefCell::new(DocumentCache::default())),
        }
    }

    fn pointer(&self, event: PointerEvent) -> Result<JsValue, JsValue> {
        let mut session = self.session.borrow_mut();
        match session.pointer(event) {
            Some(placement) => to_value(&OverlayView::new(placement, session.gesture().name())),
            None => Ok(JsValue::NULL),
        }
    }
}

/// Apply a pdf.js decode result to the session
///
/// `decoded` is the page count, or the reason pdf.js rejected the file.
/// Returns whether the document was installed, or the alert to show.
fn apply_decode(
    session: &RefCell<SigningSession>,
    ticket: DocumentTicket,
    name: &str,
    decoded: Result<u32, String>,
) -> Result<bool, String> {
    let document = decoded.and_then(|pages| {
        SourceDocument::new(name, pages).map_err(|e| match e {
            StampError::DocumentDecode(reason) => reason,
            other => other.to_string(),
        })
    });

    match document {
        Ok(document) => Ok(session
            .borrow_mut()
            .complete_document_load(ticket, document)),
        Err(reason) => {
            session.borrow().fail_document_load(ticket, &reason);
            Err(format!("Error loading PDF: {}", reason))
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js(e: StampError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_view_carries_derived_height() {
        let view = OverlayView::new(OverlayPlacement::new(50.0, 50.0, 150.0, 2.0), "idle");
        assert_eq!(view.height, 75.0);
        assert_eq!(view.gesture, "idle");
    }

    #[test]
    fn test_fresh_stamper_state() {
        let stamper = SignatureStamper::new();
        assert!(!stamper.can_save());
        assert!(!stamper.can_clear());
        assert_eq!(stamper.page_count(), 0);
        assert_eq!(stamper.output_filename(), "signed-document.pdf");
    }

    fn ticket(stamper: &SignatureStamper, name: &str) -> DocumentTicket {
        stamper
            .session
            .borrow_mut()
            .begin_document_load(name, "application/pdf")
            .unwrap()
    }

    #[test]
    fn test_decoded_document_becomes_current() {
        let stamper = SignatureStamper::new();
        let t = ticket(&stamper, "lease.pdf");
        assert_eq!(apply_decode(&stamper.session, t, "lease.pdf", Ok(3)), Ok(true));
        assert_eq!(stamper.page_count(), 3);
    }

    #[test]
    fn test_decode_failure_raises_alert_and_keeps_document() {
        let stamper = SignatureStamper::new();
        let t = ticket(&stamper, "lease.pdf");
        apply_decode(&stamper.session, t, "lease.pdf", Ok(2)).unwrap();

        let t = ticket(&stamper, "broken.pdf");
        let outcome = apply_decode(
            &stamper.session,
            t,
            "broken.pdf",
            Err("Invalid PDF structure.".to_string()),
        );
        assert_eq!(
            outcome,
            Err("Error loading PDF: Invalid PDF structure.".to_string())
        );
        assert_eq!(stamper.page_count(), 2);
        assert_eq!(
            stamper.session.borrow().document().unwrap().name(),
            "lease.pdf"
        );
    }

    #[test]
    fn test_empty_document_raises_alert() {
        let stamper = SignatureStamper::new();
        let t = ticket(&stamper, "empty.pdf");
        assert_eq!(
            apply_decode(&stamper.session, t, "empty.pdf", Ok(0)),
            Err("Error loading PDF: Document has no pages".to_string())
        );
        assert_eq!(stamper.page_count(), 0);
    }

    #[test]
    fn test_replaced_document_handle_is_released() {
        let mut cache = DocumentCache::default();
        assert_eq!(cache.install(1, "first"), None);
        assert_eq!(cache.get(1), Some(&"first"));

        assert_eq!(cache.install(2, "second"), Some("first"));
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), Some(&"second"));
    }

    #[test]
    fn test_superseded_decode_is_not_installed() {
        let stamper = SignatureStamper::new();
        let first = ticket(&stamper, "first.pdf");
        let second = ticket(&stamper, "second.pdf");
        assert_eq!(apply_decode(&stamper.session, second, "second.pdf", Ok(1)), Ok(true));
        assert_eq!(apply_decode(&stamper.session, first, "first.pdf", Ok(5)), Ok(false));
        assert_eq!(stamper.page_count(), 1);
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_with_config_rejects_bad_zoom() {
        assert!(SignatureStamper::with_config(r#"{"zoom": -1}"#).is_err());
    }

    #[wasm_bindgen_test]
    fn test_pointer_without_overlay_is_null() {
        let stamper = SignatureStamper::new();
        assert!(stamper.pointer_down(0.0, 0.0, "overlay").unwrap().is_null());
        assert!(stamper.export_bytes().unwrap().is_none());
    }
}
